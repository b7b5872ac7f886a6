use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn premultiply_zeroes_transparent_and_keeps_opaque() {
    let mut px = vec![200u8, 100, 50, 0, 10, 20, 30, 255, 255, 255, 255, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[0, 0, 0, 0]);
    assert_eq!(&px[4..8], &[10, 20, 30, 255]);
    assert_eq!(&px[8..12], &[128, 128, 128, 128]);
}

#[test]
fn unpremultiply_undoes_premultiply_within_rounding() {
    let mut px = vec![200u8, 100, 50, 128];
    premultiply_rgba8_in_place(&mut px);
    let back = unpremultiply_px([px[0], px[1], px[2], px[3]]);
    assert_eq!(back[3], 128);
    for (got, want) in back[..3].iter().zip([200u8, 100, 50]) {
        assert!((i16::from(*got) - i16::from(want)).abs() <= 2);
    }
    assert_eq!(unpremultiply_px([5, 5, 5, 0]), [0, 0, 0, 0]);
}
