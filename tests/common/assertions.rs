//! Assertion helpers for tests.

use pretty_assertions::assert_eq;
use spray_index::{is_spray_sized, parse_wad, WadLump, TRANSPARENT_INDEX, TRANSPARENT_MARKER};

/// Assert the bytes are a readable spray container and return its lump
pub fn assert_valid_container(data: &[u8]) -> WadLump {
    assert!(
        data.starts_with(b"WAD3"),
        "Expected WAD3 container, got {} bytes starting with {:?}",
        data.len(),
        &data[..4.min(data.len())]
    );
    let lump = parse_wad(data).unwrap_or_else(|e| panic!("Container does not parse: {e}"));
    let image = &lump.image;
    assert!(
        is_spray_sized(image.width(), image.height()),
        "Spray size {}x{} violates the grid",
        image.width(),
        image.height()
    );
    assert_eq!(image.indices().len(), (image.width() * image.height()) as usize);
    lump
}

/// Assert the container is a quantized decal with the transparency marker
pub fn assert_transparent_decal(lump: &WadLump) {
    assert_eq!(lump.name, "{LOGO");
    assert!(!lump.image.gradient_decal());
    assert_eq!(lump.image.palette().get(TRANSPARENT_INDEX), TRANSPARENT_MARKER);
}

/// Assert the container kept its source palette
pub fn assert_gradient_decal(lump: &WadLump) {
    assert_eq!(lump.name, "LOGO");
    assert!(lump.image.gradient_decal());
}
