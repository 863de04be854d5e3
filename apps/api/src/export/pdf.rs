use image::codecs::jpeg::JpegEncoder;
use image::{imageops, ColorType, RgbImage, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

use crate::export::fitting::{PageSize, Placement, MM_TO_PT};
use crate::export::ExportError;

const JPEG_QUALITY: u8 = 92;

/// Composites the source rows of one placement onto white and drops the alpha channel.
fn page_slice(bitmap: &RgbaImage, placement: &Placement) -> RgbImage {
    let slice = imageops::crop_imm(
        bitmap,
        0,
        placement.source_top,
        bitmap.width(),
        placement.source_height,
    )
    .to_image();

    RgbImage::from_fn(slice.width(), slice.height(), |x, y| {
        let [r, g, b, a] = slice.get_pixel(x, y).0;
        let blend = |c: u8| {
            let (c, a) = (u32::from(c), u32::from(a));
            ((c * a + 255 * (255 - a) + 127) / 255) as u8
        };
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
        .encode(image.as_raw(), image.width(), image.height(), ColorType::Rgb8)
        .map_err(|e| ExportError::Encode(format!("JPEG encoding failed: {e}")))?;
    Ok(bytes)
}

/// Builds a PDF with one image per placement, each anchored at the top-left of its
/// page. No creation date or producer is written, so equal input gives equal bytes.
pub fn render_pdf(
    bitmap: &RgbaImage,
    placements: &[Placement],
    page: PageSize,
) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();
    let (page_w, page_h) = (page.width_pt(), page.height_pt());

    let mut kids = Vec::with_capacity(placements.len());
    for placement in placements {
        let slice = page_slice(bitmap, placement);
        let image_id = doc.add_object(
            Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(slice.width()),
                    "Height" => i64::from(slice.height()),
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8i64,
                    "Filter" => "DCTDecode",
                },
                encode_jpeg(&slice)?,
            )
            .with_compression(false),
        );

        let w = placement.width_mm * MM_TO_PT;
        let h = placement.height_mm * MM_TO_PT;
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        (w as f32).into(),
                        0i64.into(),
                        0i64.into(),
                        (h as f32).into(),
                        0i64.into(),
                        ((page_h - h) as f32).into(),
                    ],
                ),
                Operation::new("Do", vec!["Im0".into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content
            .encode()
            .map_err(|e| ExportError::Encode(format!("content stream: {e}")))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0i64.into(), 0i64.into(), (page_w as f32).into(), (page_h as f32).into()],
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Encode(format!("PDF serialization failed: {e}")))?;
    Ok(bytes)
}
