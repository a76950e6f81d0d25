//! Pure Rust codec backend built on the `image` crate.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Probe | `ImageReader::with_guessed_format` + `ImageDecoder` header |
//! | Decode (JPEG, PNG, TIFF, WebP, BMP, GIF, ICO) | `image` crate decoders, content-sniffed |
//! | Resize (fit=contain) | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → PNG | `PngEncoder::new_with_quality` (compression + filter) |
//! | Encode → JPEG | `mozjpeg::Compress` (progressive mode, trellis profile, optimised scans) |
//! | Encode → WebP | `webp::Encoder::encode_advanced` (lossy, quality + method) |
//! | Encode → AVIF | `AvifEncoder::new_with_speed_quality` (rav1e, speed = 10 − effort) |
//! | Encode → TIFF | `tiff::encoder::TiffEncoder` (LZW or uncompressed) |
//! | ICO container | `IcoFrame::with_encoded` + `IcoEncoder::encode_images` |
//!
//! Knobs the codecs cannot express (PNG palette quantisation, JPEG overshoot
//! deringing, trellis on baseline JPEG) stay in the [`EncoderConfig`] and are
//! reported at `debug` level.
//!
//! AVIF *input* is not decodable: the `"avif"` feature only enables the
//! encoder.

use super::backend::{BackendError, ImageBackend, ImageHeader};
use super::encoder::{EncoderConfig, TiffCompression};
use super::params::{EncodeParams, IconParams, MAX_PIXELS, ResizeBox};
use image::codecs::avif::AvifEncoder;
use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use mozjpeg::{ColorSpace, Compress};
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;
use tiff::encoder::colortype;
use tiff::encoder::compression::{Compression, Lzw, Uncompressed};
use tracing::debug;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Png => "png".to_string(),
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Avif => "avif".to_string(),
        ImageFormat::Tiff => "tiff".to_string(),
        ImageFormat::Bmp => "bmp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        ImageFormat::Ico => "ico".to_string(),
        other => format!("{other:?}").to_lowercase(),
    }
}

fn color_space(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 | ColorType::La8 => "b-w",
        ColorType::L16 | ColorType::La16 => "grey16",
        ColorType::Rgb8 | ColorType::Rgba8 => "srgb",
        ColorType::Rgb16 | ColorType::Rgba16 => "rgb16",
        ColorType::Rgb32F | ColorType::Rgba32F => "scrgb",
        _ => "unknown",
    }
}

fn open_reader(path: &Path) -> Result<ImageReader<std::io::BufReader<File>>, BackendError> {
    // The extension guess is replaced by content sniffing when the bytes are
    // recognisable, so mislabelled files still decode.
    Ok(ImageReader::open(path)?.with_guessed_format()?)
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    open_reader(path)?.decode().map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
    })
}

fn apply_resize(img: DynamicImage, resize: Option<ResizeBox>) -> Result<DynamicImage, BackendError> {
    let Some(b) = resize else {
        return Ok(img);
    };
    let source = (img.width(), img.height());
    let (w, h) = b.bounded_target_for(source).ok_or_else(|| {
        let (w, h) = b.target_for(source);
        BackendError::ProcessingFailed(format!(
            "resize to {w}x{h} exceeds the {MAX_PIXELS} pixel limit"
        ))
    })?;
    Ok(img.resize_exact(w, h, FilterType::Lanczos3))
}

/// 8-bit RGB or RGBA, whichever keeps the alpha channel.
fn to_8bit(img: &DynamicImage) -> DynamicImage {
    if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    }
}

fn create_writer(path: &Path) -> Result<BufWriter<File>, BackendError> {
    Ok(BufWriter::new(File::create(path)?))
}

fn encode_failed(format: &str, path: &Path, e: image::ImageError) -> BackendError {
    BackendError::ProcessingFailed(format!(
        "{format} encode failed for {}: {e}",
        path.display()
    ))
}

/// JPEG settings handed to mozjpeg.
struct JpegSettings {
    quality: u8,
    progressive: bool,
    trellis_quantisation: bool,
    optimise_scans: bool,
}

/// mozjpeg's default profile is the max-compression one (trellis, progressive,
/// optimised scans). The fastest profile is the baseline starting point.
fn write_jpeg(img: &DynamicImage, path: &Path, settings: &JpegSettings) -> Result<(), BackendError> {
    // JPEG has no alpha channel.
    let rgb = img.to_rgb8();
    let mut comp = Compress::new(ColorSpace::JCS_RGB);
    if !(settings.progressive && settings.trellis_quantisation) {
        comp.set_fastest_defaults();
    }
    comp.set_size(rgb.width() as usize, rgb.height() as usize);
    comp.set_quality(f32::from(settings.quality));
    comp.set_optimize_coding(settings.optimise_scans);
    if settings.progressive {
        comp.set_progressive_mode();
        comp.set_optimize_scans(settings.optimise_scans);
    } else if settings.trellis_quantisation {
        debug!(output = %path.display(), "trellis quantisation needs progressive mode, writing plain baseline JPEG");
    }

    let mut writer = comp.start_compress(create_writer(path)?)?;
    writer.write_scanlines(rgb.as_raw())?;
    writer.finish()?.flush()?;
    Ok(())
}

/// Lossy WebP; `effort` maps onto libwebp's `method` (0 fast .. 6 slow).
fn write_webp(
    img: &DynamicImage,
    path: &Path,
    quality: u8,
    effort: u8,
    smart_subsample: bool,
) -> Result<(), BackendError> {
    let mut config = webp::WebPConfig::new().map_err(|_| {
        BackendError::ProcessingFailed("WebP encoder configuration unavailable".to_string())
    })?;
    config.lossless = 0;
    config.quality = f32::from(quality);
    config.method = i32::from(effort.min(6));
    config.use_sharp_yuv = i32::from(smart_subsample);

    let encoded = match to_8bit(img) {
        DynamicImage::ImageRgba8(rgba) => {
            webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height()).encode_advanced(&config)
        }
        pixels => {
            let rgb = pixels.to_rgb8();
            webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height()).encode_advanced(&config)
        }
    };
    let data = encoded.map_err(|e| {
        BackendError::ProcessingFailed(format!("WebP encode failed for {}: {e:?}", path.display()))
    })?;
    std::fs::write(path, &*data)?;
    Ok(())
}

fn write_tiff<C: Compression>(img: &DynamicImage, path: &Path, compression: C) -> Result<(), BackendError> {
    let tiff_failed = |e: tiff::TiffError| {
        BackendError::ProcessingFailed(format!("TIFF encode failed for {}: {e}", path.display()))
    };
    let mut encoder = tiff::encoder::TiffEncoder::new(create_writer(path)?).map_err(tiff_failed)?;
    let (w, h) = (img.width(), img.height());
    let written = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        encoder.write_image_with_compression::<colortype::RGBA8, _>(w, h, compression, rgba.as_raw())
    } else {
        let rgb = img.to_rgb8();
        encoder.write_image_with_compression::<colortype::RGB8, _>(w, h, compression, rgb.as_raw())
    };
    written.map_err(tiff_failed)
}

/// Encode `img` to `path` following `config`.
fn save_image(img: &DynamicImage, path: &Path, config: &EncoderConfig) -> Result<(), BackendError> {
    match *config {
        EncoderConfig::Png {
            compression_level,
            adaptive_filtering,
            palette,
        } => {
            if palette {
                debug!(output = %path.display(), "palette quantisation not available, writing truecolor PNG");
            }
            let compression = if compression_level >= 9 {
                CompressionType::Best
            } else {
                CompressionType::Default
            };
            let filter = if adaptive_filtering {
                PngFilter::Adaptive
            } else {
                PngFilter::NoFilter
            };
            let encoder = PngEncoder::new_with_quality(create_writer(path)?, compression, filter);
            img.write_with_encoder(encoder)
                .map_err(|e| encode_failed("PNG", path, e))
        }
        EncoderConfig::Jpeg {
            quality,
            progressive,
            trellis_quantisation,
            optimise_scans,
            overshoot_deringing,
        } => {
            if overshoot_deringing {
                debug!(output = %path.display(), "overshoot deringing not exposed by mozjpeg bindings");
            }
            write_jpeg(
                img,
                path,
                &JpegSettings {
                    quality: quality.value(),
                    progressive,
                    trellis_quantisation,
                    optimise_scans,
                },
            )
        }
        EncoderConfig::WebP {
            quality,
            effort,
            smart_subsample,
        } => write_webp(img, path, quality.value(), effort, smart_subsample),
        EncoderConfig::Avif {
            quality, effort, ..
        } => {
            let speed = 10u8.saturating_sub(effort).clamp(1, 10);
            let encoder =
                AvifEncoder::new_with_speed_quality(create_writer(path)?, speed, quality.value());
            to_8bit(img)
                .write_with_encoder(encoder)
                .map_err(|e| encode_failed("AVIF", path, e))
        }
        EncoderConfig::Tiff { compression, .. } => match compression {
            TiffCompression::Lzw => write_tiff(img, path, Lzw::default()),
            TiffCompression::None => write_tiff(img, path, Uncompressed::default()),
        },
        EncoderConfig::Icon => Err(BackendError::ProcessingFailed(
            "ICO output must go through encode_icon".to_string(),
        )),
    }
}

fn png_bytes(img: &DynamicImage) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {e}")))?;
    Ok(buf)
}

fn decode_bytes(bytes: &[u8], source: &Path) -> Result<DynamicImage, BackendError> {
    image::load_from_memory(bytes).map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to decode {}: {}", source.display(), e))
    })
}

impl ImageBackend for RustBackend {
    fn probe(&self, path: &Path) -> Result<ImageHeader, BackendError> {
        let reader = open_reader(path)?;
        let format = reader
            .format()
            .map(format_name)
            .unwrap_or_else(|| "unknown".to_string());
        let decoder = reader.into_decoder().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read header of {}: {}", path.display(), e))
        })?;
        let (width, height) = decoder.dimensions();
        let color = decoder.color_type();

        Ok(ImageHeader {
            format,
            width,
            height,
            channels: color.channel_count(),
            color_space: color_space(color).to_string(),
        })
    }

    fn encode(&self, params: &EncodeParams) -> Result<(), BackendError> {
        let img = apply_resize(load_image(&params.source)?, params.resize)?;
        save_image(&img, &params.output, &params.encoder)
    }

    fn encode_icon(&self, params: &IconParams) -> Result<(), BackendError> {
        let raw = std::fs::read(&params.source)?;

        let png = match params.resize {
            Some(_) => png_bytes(&apply_resize(decode_bytes(&raw, &params.source)?, params.resize)?)?,
            None if raw.starts_with(PNG_SIGNATURE) => raw,
            None => png_bytes(&decode_bytes(&raw, &params.source)?)?,
        };

        let decoder = ImageReader::with_format(Cursor::new(png.as_slice()), ImageFormat::Png)
            .into_decoder()
            .map_err(|e| BackendError::ProcessingFailed(format!("Invalid PNG frame: {e}")))?;
        let (width, height) = decoder.dimensions();
        let color = decoder.color_type();

        let frame = IcoFrame::with_encoded(png.as_slice(), width, height, color.into())
            .map_err(|e| BackendError::ProcessingFailed(format!("ICO frame rejected: {e}")))?;
        IcoEncoder::new(create_writer(&params.output)?)
            .encode_images(&[frame])
            .map_err(|e| encode_failed("ICO", &params.output, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Quality, TargetFormat};
    use crate::imaging::encoder::configure;
    use crate::imaging::params::MAX_DIMENSION;
    use crate::test_helpers::{write_noisy_png, write_png, write_rgba_png};

    fn encode_params(source: &Path, output: &Path, format: TargetFormat) -> EncodeParams {
        EncodeParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            resize: None,
            encoder: configure(format, Quality::new(80), true, false),
        }
    }

    /// Frame type from the first SOFn segment (0xC0 baseline, 0xC2 progressive).
    fn sof_marker(bytes: &[u8]) -> Option<u8> {
        let mut i = 2;
        while i + 4 <= bytes.len() {
            if bytes[i] != 0xFF {
                return None;
            }
            let marker = bytes[i + 1];
            if matches!(marker, 0xC0..=0xC3) {
                return Some(marker);
            }
            let len = u16::from_be_bytes([bytes[i + 2], bytes[i + 3]]) as usize;
            i += 2 + len;
        }
        None
    }

    fn encode_with(source: &Path, output: &Path, encoder: EncoderConfig) -> Vec<u8> {
        RustBackend::new()
            .encode(&EncodeParams {
                source: source.to_path_buf(),
                output: output.to_path_buf(),
                resize: None,
                encoder,
            })
            .unwrap();
        std::fs::read(output).unwrap()
    }

    fn tiff_compression_tag(path: &Path) -> u32 {
        let mut decoder = tiff::decoder::Decoder::new(File::open(path).unwrap()).unwrap();
        decoder.get_tag_u32(tiff::tags::Tag::Compression).unwrap()
    }

    #[test]
    fn probe_synthetic_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.png");
        write_png(&path, 200, 150);

        let header = RustBackend::new().probe(&path).unwrap();
        assert_eq!(header.format, "png");
        assert_eq!((header.width, header.height), (200, 150));
        assert_eq!(header.channels, 3);
        assert_eq!(header.color_space, "srgb");
    }

    #[test]
    fn probe_reports_alpha_channel() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("alpha.png");
        write_rgba_png(&path, 32, 32);

        let header = RustBackend::new().probe(&path).unwrap();
        assert_eq!(header.channels, 4);
    }

    #[test]
    fn probe_sniffs_content_over_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("drawing.svg");
        write_png(&path, 40, 30);

        let header = RustBackend::new().probe(&path).unwrap();
        assert_eq!(header.format, "png");
        assert_eq!(header.width, 40);
    }

    #[test]
    fn probe_nonexistent_file_errors() {
        let result = RustBackend::new().probe(Path::new("/nonexistent/image.png"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn encode_each_direct_format() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        write_png(&source, 48, 32);

        let backend = RustBackend::new();
        for format in [
            TargetFormat::Png,
            TargetFormat::Jpeg,
            TargetFormat::Webp,
            TargetFormat::Avif,
            TargetFormat::Tiff,
        ] {
            let output = tmp.path().join(format!("out.{format}"));
            backend
                .encode(&encode_params(&source, &output, format))
                .unwrap();
            let header = backend.probe(&output);
            if format != TargetFormat::Avif {
                let header = header.unwrap();
                assert_eq!((header.width, header.height), (48, 32), "{format}");
            }
            assert!(std::fs::metadata(&output).unwrap().len() > 0);
        }
    }

    #[test]
    fn encode_jpeg_drops_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("alpha.png");
        write_rgba_png(&source, 20, 20);
        let output = tmp.path().join("flat.jpg");

        let backend = RustBackend::new();
        backend
            .encode(&encode_params(&source, &output, TargetFormat::Jpg))
            .unwrap();
        assert_eq!(backend.probe(&output).unwrap().channels, 3);
    }

    #[test]
    fn encode_bmp_request_writes_png_bytes() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        write_png(&source, 16, 16);
        let output = tmp.path().join("out.bmp");

        RustBackend::new()
            .encode(&encode_params(&source, &output, TargetFormat::Bmp))
            .unwrap();
        let bytes = std::fs::read(&output).unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE));
        assert!(!bytes.starts_with(b"BM"));
    }

    #[test]
    fn encode_resizes_with_contain() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        write_png(&source, 400, 200);
        let output = tmp.path().join("small.png");

        let backend = RustBackend::new();
        let mut params = encode_params(&source, &output, TargetFormat::Png);
        params.resize = ResizeBox::from_request(Some(100), Some(100));
        backend.encode(&params).unwrap();

        let header = backend.probe(&output).unwrap();
        assert_eq!((header.width, header.height), (100, 50));
    }

    #[test]
    fn encode_garbage_source_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("broken.png");
        std::fs::write(&source, b"definitely not an image").unwrap();
        let output = tmp.path().join("out.webp");

        let result = RustBackend::new().encode(&encode_params(&source, &output, TargetFormat::Webp));
        match result {
            Err(BackendError::ProcessingFailed(msg)) => assert!(msg.contains("broken.png")),
            other => panic!("expected decode failure, got {other:?}"),
        }
    }

    #[test]
    fn icon_from_png_source() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("icon.png");
        write_rgba_png(&source, 32, 32);
        let output = tmp.path().join("favicon.ico");

        let backend = RustBackend::new();
        backend
            .encode_icon(&IconParams {
                source,
                output: output.clone(),
                resize: None,
            })
            .unwrap();

        let header = backend.probe(&output).unwrap();
        assert_eq!(header.format, "ico");
        assert_eq!((header.width, header.height), (32, 32));
    }

    #[test]
    fn icon_resizes_large_source() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("large.png");
        write_png(&source, 512, 256);
        let output = tmp.path().join("favicon.ico");

        let backend = RustBackend::new();
        backend
            .encode_icon(&IconParams {
                source,
                output: output.clone(),
                resize: ResizeBox::from_request(Some(64), Some(64)),
            })
            .unwrap();

        let header = backend.probe(&output).unwrap();
        assert_eq!((header.width, header.height), (64, 32));
    }

    #[test]
    fn icon_rejects_frames_over_256px() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("large.png");
        write_png(&source, 300, 300);

        let result = RustBackend::new().encode_icon(&IconParams {
            source,
            output: tmp.path().join("favicon.ico"),
            resize: None,
        });
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }

    #[test]
    fn jpeg_progressive_flag_selects_frame_type() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("photo.png");
        write_png(&source, 64, 48);

        for optimize in [false, true] {
            let progressive = encode_with(
                &source,
                &tmp.path().join("progressive.jpg"),
                configure(TargetFormat::Jpeg, Quality::new(85), optimize, true),
            );
            assert_eq!(sof_marker(&progressive), Some(0xC2), "optimize={optimize}");

            let baseline = encode_with(
                &source,
                &tmp.path().join("baseline.jpg"),
                configure(TargetFormat::Jpeg, Quality::new(85), optimize, false),
            );
            assert_eq!(sof_marker(&baseline), Some(0xC0), "optimize={optimize}");
        }
    }

    #[test]
    fn jpeg_output_decodes_at_source_size() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("photo.png");
        write_png(&source, 64, 48);
        let output = tmp.path().join("photo.jpeg");

        encode_with(
            &source,
            &output,
            configure(TargetFormat::Jpeg, Quality::new(85), true, true),
        );
        assert_eq!(image::image_dimensions(&output).unwrap(), (64, 48));
    }

    #[test]
    fn webp_is_lossy_and_follows_quality() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("noise.png");
        write_noisy_png(&source, 256, 256);

        let low = encode_with(
            &source,
            &tmp.path().join("low.webp"),
            configure(TargetFormat::Webp, Quality::new(10), false, false),
        );
        let high = encode_with(
            &source,
            &tmp.path().join("high.webp"),
            configure(TargetFormat::Webp, Quality::new(95), false, false),
        );

        assert_eq!(&low[..4], b"RIFF");
        assert_eq!(&low[12..16], b"VP8 ");
        assert_eq!(&high[12..16], b"VP8 ");
        assert!(low.len() < high.len(), "q10={} q95={}", low.len(), high.len());
    }

    #[test]
    fn webp_keeps_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("sprite.png");
        write_rgba_png(&source, 32, 32);
        let output = tmp.path().join("sprite.webp");

        encode_with(
            &source,
            &output,
            configure(TargetFormat::Webp, Quality::new(80), true, false),
        );
        assert_eq!(RustBackend::new().probe(&output).unwrap().channels, 4);
    }

    #[test]
    fn tiff_compression_follows_optimize() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("scan.png");
        write_png(&source, 40, 30);
        let lzw = tmp.path().join("lzw.tiff");
        let plain = tmp.path().join("plain.tiff");

        encode_with(&source, &lzw, configure(TargetFormat::Tiff, Quality::new(80), true, false));
        encode_with(&source, &plain, configure(TargetFormat::Tiff, Quality::new(80), false, false));

        // TIFF compression codes: 1 none, 5 LZW
        assert_eq!(tiff_compression_tag(&lzw), 5);
        assert_eq!(tiff_compression_tag(&plain), 1);
        assert_eq!(image::image_dimensions(&lzw).unwrap(), (40, 30));
    }

    #[test]
    fn encode_rejects_resize_past_pixel_limit() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("strip.png");
        write_png(&source, 1, 100);
        let output = tmp.path().join("huge.png");

        let mut params = encode_params(&source, &output, TargetFormat::Png);
        params.resize = ResizeBox::from_request(Some(MAX_DIMENSION), None);
        match RustBackend::new().encode(&params) {
            Err(BackendError::ProcessingFailed(msg)) => assert!(msg.contains("pixel limit"), "{msg}"),
            other => panic!("expected pixel limit failure, got {other:?}"),
        }
        assert!(!output.exists());
    }
}
