//! Fixed letter text. Cover-letter paragraphs are assembled in `cover_letter.rs`;
//! cancellation bodies are used verbatim.

pub const SALUTATION: &str = "Madame, Monsieur,";

pub const CLOSING_FORMULA: &str =
    "Je vous prie d'agréer, Madame, Monsieur, l'expression de mes salutations distinguées.";

/// Marker in the experience summary that switches the framing to "recent graduate".
pub const GRADUATE_MARKER: &str = "diplômé";

pub const GRADUATE_FRAMING: &str = "diplômé(e)";
pub const PROFESSIONAL_FRAMING: &str = "professionnel(le)";

pub const MOTIVATION_PARAGRAPH_TAIL: &str = "qui me permettraient d'être rapidement opérationnel(le) au sein de votre équipe. Je suis particulièrement intéressé(e) par votre entreprise car elle incarne des valeurs auxquelles j'adhère pleinement et représente pour moi une opportunité exceptionnelle de mettre à profit mes compétences tout en relevant de nouveaux défis.";

pub const FIT_PARAGRAPH: &str = "Je suis convaincu(e) que mon profil correspond aux attentes que vous avez pour ce poste. Ma capacité d'adaptation, mon sens de l'organisation et ma rigueur sont des atouts qui me permettront de m'intégrer efficacement dans vos équipes et de contribuer activement à la réussite de vos projets.";

pub const INTERVIEW_PARAGRAPH: &str = "Je me tiens à votre entière disposition pour un entretien qui me permettrait de vous exposer plus en détail ma motivation et vous convaincre de l'adéquation de mon profil avec le poste proposé.";

// ────────────────────────────────────────────────────────────────────────────
// Cancellation bodies
// ────────────────────────────────────────────────────────────────────────────

pub const CANCEL_SUBSCRIPTION: &str = "Je souhaite par la présente résilier mon contrat référencé ci-dessus.\n\nConformément aux dispositions légales en vigueur et aux conditions générales de vente, je vous demande de bien vouloir prendre en compte cette demande de résiliation dans les délais prévus.\n\nJe vous remercie de me confirmer la bonne réception de ce courrier ainsi que la date effective de résiliation.";

pub const CANCEL_INSURANCE: &str = "Je vous informe par la présente de ma décision de résilier mon contrat d'assurance référencé ci-dessus.\n\nJe vous prie de bien vouloir procéder à la résiliation de ce contrat conformément aux dispositions légales (loi Hamon/Chatel) à compter de la réception de ce courrier.\n\nJe vous remercie de me confirmer cette résiliation par écrit et de me préciser sa date effective.";

pub const CANCEL_LEASE: &str = "Je vous informe par la présente de ma décision de résilier le bail d'habitation pour le logement situé à l'adresse mentionnée ci-dessus.\n\nConformément à la législation en vigueur, je respecte un préavis de 3 mois à compter de la réception de ce courrier.\n\nJe vous remercie de bien vouloir m'indiquer vos disponibilités pour effectuer l'état des lieux de sortie.";

pub const CANCEL_GYM: &str = "Je vous informe par la présente de ma volonté de résilier mon abonnement à votre salle de sport, référencé ci-dessus.\n\nConformément aux conditions générales d'abonnement et aux dispositions légales applicables, je vous prie de bien vouloir procéder à la résiliation de mon contrat.\n\nJe vous serais reconnaissant de bien vouloir me confirmer la prise en compte de cette demande ainsi que la date effective de résiliation.";

pub const CANCEL_OTHER: &str = "Je vous informe par la présente de ma décision de résilier le contrat/service référencé ci-dessus.\n\nConformément aux conditions contractuelles et aux dispositions légales en vigueur, je vous demande de bien vouloir prendre en compte cette demande dans les meilleurs délais.\n\nJe vous remercie de me confirmer par écrit la bonne réception de ce courrier ainsi que la date effective de résiliation.";
