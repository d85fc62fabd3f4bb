//! Integration tests for stegvault
//!
//! Covers the full hide/extract path through encoded image files, plus the
//! frame and capacity guarantees callers depend on.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgb, Rgba};
use stegvault::{
    build_frame, capacity, extract, extract_file, extract_with_config, hide, hide_file,
    parse_frame, ChannelMode, CoverImage, Embedder, FrameError, LsbEmbedder, Payload,
    StegoConfig, StegoError,
};

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
        let shade = (255 * y / height.max(1)) as u8;
        Rgb([shade, 200u8.wrapping_add((x * 7 % 13) as u8), 255 - shade])
    }))
}

fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

fn png_cover(width: u32, height: u32) -> CoverImage {
    CoverImage::from_bytes(&encode(&gradient(width, height), ImageFormat::Png)).unwrap()
}

/// Test the plain round-trip through PNG bytes
#[test]
fn test_hide_extract_plain_through_png() {
    let payload = Payload::new("a.bin", b"\x01\x02\x03".to_vec());

    let stego = hide(&png_cover(200, 150), &payload, None).unwrap();
    let reloaded = CoverImage::from_bytes(&stego.to_png_bytes().unwrap()).unwrap();
    let extracted = extract(&reloaded, None).unwrap();

    assert_eq!(extracted.name, "a.bin");
    assert_eq!(extracted.data, b"\x01\x02\x03");
}

/// Test the encrypted round-trip through BMP bytes
#[test]
fn test_hide_extract_encrypted_through_bmp() {
    let cover = CoverImage::from_bytes(&encode(&gradient(160, 120), ImageFormat::Bmp)).unwrap();
    let data: Vec<u8> = (0..2000u32).map(|i| (i * 31 % 251) as u8).collect();
    let payload = Payload::new("firmware.img", data.clone());

    let stego = hide(&cover, &payload, Some("hunter2")).unwrap();
    let reloaded = CoverImage::from_bytes(&encode(stego.image(), ImageFormat::Bmp)).unwrap();
    let extracted = extract(&reloaded, Some("hunter2")).unwrap();

    assert_eq!(extracted.data, data);
    assert!(extracted.encrypted);
}

/// Test that an empty payload survives
#[test]
fn test_empty_payload_roundtrip() {
    let stego = hide(&png_cover(100, 100), &Payload::new("empty", vec![]), None).unwrap();
    let extracted = extract(&stego.into_cover(), None).unwrap();

    assert_eq!(extracted.name, "empty");
    assert!(extracted.data.is_empty());
}

/// Test that the wrong password fails authentication and returns no data
#[test]
fn test_wrong_password_fails() {
    let payload = Payload::new("secret.txt", b"attack at dawn".to_vec());
    let stego = hide(&png_cover(120, 120), &payload, Some("correct")).unwrap().into_cover();

    let err = extract(&stego, Some("wrong")).unwrap_err();
    assert!(err.is_authentication_failure());
    assert!(!err.to_string().contains("attack"));
}

/// Test that an encrypted payload needs a password
#[test]
fn test_missing_password_fails() {
    let payload = Payload::new("secret.txt", b"attack at dawn".to_vec());
    let stego = hide(&png_cover(120, 120), &payload, Some("correct")).unwrap().into_cover();

    assert!(extract(&stego, None).unwrap_err().is_password_required());
}

/// Test that flipping a hidden bit inside the token is detected
#[test]
fn test_tampered_image_fails_authentication() {
    let payload = Payload::new("n.bin", vec![0x5A; 64]);
    let frame = build_frame("n.bin", payload.data(), Some("pw")).unwrap();

    // Corrupt one token byte in the frame, then embed it as if it were genuine.
    let (head, encoded) = frame.rsplit_once(':').unwrap();
    let mut body = BASE64.decode(encoded).unwrap();
    let last = body.len() - 5;
    body[last] ^= 0x04;
    let tampered = format!("{}:{}", head, BASE64.encode(body));

    let image = LsbEmbedder.embed(png_cover(120, 120).image(), &tampered).unwrap();
    let err = extract(&CoverImage::from_image(image, None), Some("pw")).unwrap_err();

    assert!(matches!(err, StegoError::Frame(FrameError::Authentication)));
}

/// Test that a truncated plain payload is a size mismatch
#[test]
fn test_size_mismatch_detected() {
    let frame = build_frame("n.bin", b"abcdef", None).unwrap();
    let lying = frame.replacen(":6:", ":7:", 1);

    let image = LsbEmbedder.embed(png_cover(120, 120).image(), &lying).unwrap();
    let err = extract(&CoverImage::from_image(image, None), None).unwrap_err();

    assert!(err.is_size_mismatch());
}

/// Test that an untouched image reports no hidden data
#[test]
fn test_clean_image_has_no_hidden_data() {
    let blank = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(150, 150, Rgb([0u8, 0, 0])));
    let cover = CoverImage::from_bytes(&encode(&blank, ImageFormat::Png)).unwrap();

    assert!(matches!(extract(&cover, None), Err(StegoError::NoHiddenData)));
}

/// Test that JPEG covers are refused
#[test]
fn test_jpeg_cover_rejected() {
    let cover = CoverImage::from_bytes(&encode(&gradient(200, 200), ImageFormat::Jpeg)).unwrap();
    let result = hide(&cover, &Payload::new("a", vec![1]), None);

    assert!(matches!(result, Err(StegoError::Validation(_))));
}

/// Test that payloads beyond capacity are refused before embedding
#[test]
fn test_capacity_exceeded() {
    let cover = png_cover(100, 100);
    let payload = Payload::new("big", vec![0; cover.capacity() as usize + 1]);

    assert!(matches!(
        hide(&cover, &payload, None),
        Err(StegoError::CapacityExceeded { .. })
    ));
}

/// Test that RGBA covers carry more than RGB covers of the same size
#[test]
fn test_rgba_cover_capacity() {
    let rgba = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(100, 100, Rgba([1u8, 2, 3, 255])));
    let cover = CoverImage::from_bytes(&encode(&rgba, ImageFormat::Png)).unwrap();

    assert_eq!(cover.channel_mode(), ChannelMode::Rgba);
    assert_eq!(cover.capacity(), capacity(100, 100, ChannelMode::Rgba));
    assert!(cover.capacity() > capacity(100, 100, ChannelMode::Rgb));

    let payload = Payload::new("full", vec![0xEE; cover.capacity() as usize]);
    let stego = hide(&cover, &payload, None).unwrap();
    assert_eq!(extract(&stego.into_cover(), None).unwrap().data.len(), payload.len());
}

/// Test the documented frame example
#[test]
fn test_frame_example() {
    let frame = build_frame("a.bin", b"\x01\x02\x03", None).unwrap();
    assert_eq!(frame, "MARK:a.bin:3:fFBMQUlOfAECAw==");

    let parsed = parse_frame(&frame, None).unwrap();
    assert_eq!((parsed.name.as_str(), parsed.data.as_slice()), ("a.bin", &b"\x01\x02\x03"[..]));
}

/// Test expiring tokens through configuration
#[test]
fn test_ttl_config_accepts_fresh_payload() {
    let config = StegoConfig::from_toml_str("token_ttl_secs = 600\n").unwrap();
    let payload = Payload::new("fresh", b"new".to_vec());
    let stego = hide(&png_cover(100, 100), &payload, Some("pw")).unwrap().into_cover();

    let extracted = extract_with_config(&stego, Some("pw"), &LsbEmbedder, &config).unwrap();
    assert_eq!(extracted.data, b"new");
}

/// Test the file-level helpers end to end
#[test]
fn test_hide_file_then_extract_file() {
    let dir = tempfile::tempdir().unwrap();
    let payload_path = dir.path().join("payload.zip");
    let cover_path = dir.path().join("cover.png");
    let stego_path = dir.path().join("stego.tiff");
    let output_path = dir.path().join("restored.zip");

    let data: Vec<u8> = (0..500u32).map(|i| (i % 256) as u8).collect();
    std::fs::write(&payload_path, &data).unwrap();
    gradient(150, 150).save(&cover_path).unwrap();

    let config = StegoConfig::default();
    let report = hide_file(&payload_path, &cover_path, &stego_path, Some("pw"), &config).unwrap();
    assert_eq!(report.format, ImageFormat::Tiff);
    assert!(report.encrypted);

    let file = extract_file(&stego_path, &output_path, Some("pw"), &config).unwrap();
    assert_eq!(file.name, "payload.zip");
    assert_eq!(std::fs::read(&output_path).unwrap(), data);
}

/// Test that a grayscale stego image asked for as BMP still extracts
#[test]
fn test_grayscale_cover_with_bmp_output() {
    let dir = tempfile::tempdir().unwrap();
    let payload_path = dir.path().join("note.txt");
    let cover_path = dir.path().join("gray.png");
    let stego_path = dir.path().join("stego.bmp");

    std::fs::write(&payload_path, [0x42u8; 50]).unwrap();
    let gray = ImageBuffer::from_fn(120, 100, |x, y| Luma([((x * 5 + y) % 256) as u8]));
    DynamicImage::ImageLuma8(gray).save(&cover_path).unwrap();

    let config = StegoConfig::default();
    let report = hide_file(&payload_path, &cover_path, &stego_path, None, &config).unwrap();
    assert_eq!(report.format, ImageFormat::Png);

    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();
    let file = extract_file(&stego_path, &out_dir, None, &config).unwrap();
    assert_eq!(std::fs::read(&file.path).unwrap(), vec![0x42u8; 50]);
}
