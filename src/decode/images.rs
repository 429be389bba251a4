//! Embedded image discovery and materialization.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::model::{ExtractedImage, ImageFormat, ImageRef};

use super::text::resolve;

/// Image XObjects listed in a page's resources, in resource-dictionary order.
///
/// Only indirect references to `/Subtype /Image` streams are returned;
/// forms and inline images are not followed.
pub(crate) fn page_image_refs(doc: &Document, resources: Option<&Dictionary>) -> Vec<ImageRef> {
    let Some(xobjects) = resources
        .and_then(|res| res.get(b"XObject").ok())
        .and_then(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_dict().ok())
    else {
        return Vec::new();
    };

    let mut refs = Vec::new();
    for (name, obj) in xobjects.iter() {
        let Ok(id) = obj.as_reference() else {
            continue;
        };
        if let Ok(Object::Stream(stream)) = doc.get_object(id) {
            if is_image(&stream.dict) {
                let name = String::from_utf8_lossy(name).into_owned();
                refs.push(ImageRef::new(id.0, id.1, name));
            }
        }
    }
    refs
}

fn is_image(dict: &Dictionary) -> bool {
    matches!(dict.get(b"Subtype").and_then(|o| o.as_name_str()), Ok("Image"))
}

/// Materialize an image XObject.
///
/// JPEG and JPEG 2000 data is passed through. 8-bit Gray, RGB and CMYK
/// samples are re-encoded as PNG. Anything else is an
/// [`Error::ImageExtract`].
pub(crate) fn extract_image(doc: &Document, reference: &ImageRef) -> Result<ExtractedImage> {
    let id: ObjectId = (reference.object, reference.generation);
    let stream = match doc.get_object(id) {
        Ok(Object::Stream(stream)) if is_image(&stream.dict) => stream,
        Ok(_) => {
            return Err(Error::ImageExtract(format!(
                "{} is not an image XObject",
                reference
            )))
        }
        Err(e) => return Err(Error::ImageExtract(format!("{}: {}", reference, e))),
    };

    let dict = &stream.dict;
    let width = dimension(dict, b"Width")?;
    let height = dimension(dict, b"Height")?;
    let filters = filter_names(dict);

    match filters.as_slice() {
        [only] if only == "DCTDecode" => Ok(ExtractedImage {
            data: stream.content.clone(),
            format: ImageFormat::Jpeg,
            width,
            height,
        }),
        [only] if only == "JPXDecode" => Ok(ExtractedImage {
            data: stream.content.clone(),
            format: ImageFormat::Jpx,
            width,
            height,
        }),
        [] => encode_png(doc, dict, &stream.content, width, height),
        [only] if only == "FlateDecode" || only == "LZWDecode" => {
            let samples = decompress(stream, reference)?;
            encode_png(doc, dict, &samples, width, height)
        }
        other => Err(Error::ImageExtract(format!(
            "{}: unsupported filter {}",
            reference,
            other.join(", ")
        ))),
    }
}

fn dimension(dict: &Dictionary, key: &[u8]) -> Result<u32> {
    dict.get(key)
        .ok()
        .and_then(|v| v.as_i64().ok())
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v > 0)
        .ok_or_else(|| {
            Error::ImageExtract(format!(
                "missing or invalid /{}",
                String::from_utf8_lossy(key)
            ))
        })
}

fn filter_names(dict: &Dictionary) -> Vec<String> {
    match dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![String::from_utf8_lossy(name).into_owned()],
        Ok(Object::Array(arr)) => arr
            .iter()
            .filter_map(|o| o.as_name_str().ok())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

fn decompress(stream: &Stream, reference: &ImageRef) -> Result<Vec<u8>> {
    stream
        .decompressed_content()
        .map_err(|e| Error::ImageExtract(format!("{}: {}", reference, e)))
}

/// Number of colour components, resolving `ICCBased` through its `/N`.
fn components(doc: &Document, dict: &Dictionary) -> Result<u8> {
    let cs = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|obj| resolve(doc, obj))
        .ok_or_else(|| Error::ImageExtract("missing /ColorSpace".to_string()))?;

    let name = match cs {
        Object::Name(n) => String::from_utf8_lossy(n).into_owned(),
        Object::Array(arr) => arr
            .first()
            .and_then(|o| o.as_name_str().ok())
            .unwrap_or("")
            .to_string(),
        _ => String::new(),
    };

    match name.as_str() {
        "DeviceGray" | "G" => Ok(1),
        "DeviceRGB" | "RGB" => Ok(3),
        "DeviceCMYK" | "CMYK" => Ok(4),
        "ICCBased" => {
            let n = cs
                .as_array()
                .ok()
                .and_then(|arr| arr.get(1))
                .and_then(|obj| resolve(doc, obj))
                .and_then(|obj| obj.as_stream().ok())
                .and_then(|icc| icc.dict.get(b"N").ok())
                .and_then(|n| n.as_i64().ok());
            match n {
                Some(1) => Ok(1),
                Some(3) => Ok(3),
                Some(4) => Ok(4),
                _ => Err(Error::ImageExtract(
                    "ICCBased colour space without a usable /N".to_string(),
                )),
            }
        }
        other => Err(Error::ImageExtract(format!(
            "unsupported colour space {}",
            other
        ))),
    }
}

fn encode_png(
    doc: &Document,
    dict: &Dictionary,
    samples: &[u8],
    width: u32,
    height: u32,
) -> Result<ExtractedImage> {
    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|b| b.as_i64().ok())
        .unwrap_or(8);
    if bits != 8 {
        return Err(Error::ImageExtract(format!(
            "unsupported {} bits per component",
            bits
        )));
    }

    let comps = components(doc, dict)?;
    let pixels = width as usize * height as usize;
    let expected = pixels * comps as usize;
    if samples.len() < expected {
        return Err(Error::ImageExtract(format!(
            "expected {} bytes of samples, found {}",
            expected,
            samples.len()
        )));
    }
    let samples = &samples[..expected];

    let img = match comps {
        1 => GrayImage::from_raw(width, height, samples.to_vec()).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(width, height, samples.to_vec()).map(DynamicImage::ImageRgb8),
        _ => RgbImage::from_raw(width, height, cmyk_to_rgb(samples)).map(DynamicImage::ImageRgb8),
    }
    .ok_or_else(|| Error::ImageExtract("failed to create image buffer".to_string()))?;

    let mut output = Cursor::new(Vec::new());
    img.write_to(&mut output, image::ImageFormat::Png)?;

    Ok(ExtractedImage {
        data: output.into_inner(),
        format: ImageFormat::Png,
        width,
        height,
    })
}

/// Naive CMYK to RGB conversion without a colour profile.
fn cmyk_to_rgb(samples: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(samples.len() / 4 * 3);
    for px in samples.chunks_exact(4) {
        let k = 1.0 - px[3] as f32 / 255.0;
        for &c in &px[..3] {
            rgb.push(((1.0 - c as f32 / 255.0) * k * 255.0).round() as u8);
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn doc_with_image(dict: Dictionary, data: Vec<u8>) -> (Document, ImageRef) {
        let mut doc = Document::with_version("1.5");
        let id = doc.add_object(Object::Stream(Stream::new(dict, data)));
        (doc, ImageRef::new(id.0, id.1, "Im0"))
    }

    #[test]
    fn test_raw_rgb_becomes_png() {
        let (doc, r) = doc_with_image(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 2i64,
                "Height" => 2i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8i64,
            },
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 0],
        );
        let img = extract_image(&doc, &r).unwrap();
        assert_eq!(img.format, ImageFormat::Png);
        assert_eq!((img.width, img.height), (2, 2));
        assert_eq!(&img.data[1..4], b"PNG");
    }

    #[test]
    fn test_jpeg_passthrough() {
        let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        let (doc, r) = doc_with_image(
            dictionary! {
                "Subtype" => "Image",
                "Width" => 1i64,
                "Height" => 1i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8i64,
                "Filter" => "DCTDecode",
            },
            jpeg.clone(),
        );
        let img = extract_image(&doc, &r).unwrap();
        assert_eq!(img.format, ImageFormat::Jpeg);
        assert_eq!(img.data, jpeg);
    }

    #[test]
    fn test_unsupported_filter_is_error() {
        let (doc, r) = doc_with_image(
            dictionary! {
                "Subtype" => "Image",
                "Width" => 1i64,
                "Height" => 1i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 1i64,
                "Filter" => "CCITTFaxDecode",
            },
            vec![0],
        );
        assert!(matches!(extract_image(&doc, &r), Err(Error::ImageExtract(_))));
    }

    #[test]
    fn test_short_samples_is_error() {
        let (doc, r) = doc_with_image(
            dictionary! {
                "Subtype" => "Image",
                "Width" => 4i64,
                "Height" => 4i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8i64,
            },
            vec![0; 3],
        );
        assert!(matches!(extract_image(&doc, &r), Err(Error::ImageExtract(_))));
    }

    #[test]
    fn test_cmyk_to_rgb() {
        assert_eq!(cmyk_to_rgb(&[0, 0, 0, 0]), vec![255, 255, 255]);
        assert_eq!(cmyk_to_rgb(&[0, 0, 0, 255]), vec![0, 0, 0]);
        assert_eq!(cmyk_to_rgb(&[255, 0, 0, 0]), vec![0, 255, 255]);
    }
}
