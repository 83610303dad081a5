//! Properties of the channel reorder transform.

use cam_preview::convert::{swap_red_blue, ColorConversion};
use cam_preview::{Frame, PixelOrder};

/// Deterministic pseudo-random 3-channel buffers of assorted sizes.
fn sample_buffers() -> Vec<Vec<u8>> {
    let mut state: u32 = 0x1234_5678;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state & 0xFF) as u8
    };

    [0usize, 1, 2, 7, 64, 640 * 3]
        .iter()
        .map(|&pixels| (0..pixels * 3).map(|_| next()).collect())
        .collect()
}

#[test]
fn test_transform_is_deterministic() {
    for buf in sample_buffers() {
        let a = ColorConversion::BgrToRgb.apply(&buf);
        let b = ColorConversion::BgrToRgb.apply(&buf);
        assert_eq!(a, b);
    }
}

#[test]
fn test_transform_preserves_length() {
    for buf in sample_buffers() {
        assert_eq!(ColorConversion::BgrToRgb.apply(&buf).len(), buf.len());
        assert_eq!(ColorConversion::RgbToBgr.apply(&buf).len(), buf.len());
    }
}

#[test]
fn test_forward_then_inverse_round_trips() {
    for conversion in [ColorConversion::BgrToRgb, ColorConversion::RgbToBgr] {
        for buf in sample_buffers() {
            let there = conversion.apply(&buf);
            let back = conversion.inverse().apply(&there);
            assert_eq!(back, buf);
        }
    }
}

#[test]
fn test_green_channel_untouched() {
    for buf in sample_buffers() {
        let out = ColorConversion::BgrToRgb.apply(&buf);
        for (src, dst) in buf.chunks_exact(3).zip(out.chunks_exact(3)) {
            assert_eq!(src[1], dst[1]);
            assert_eq!(src[0], dst[2]);
            assert_eq!(src[2], dst[0]);
        }
    }
}

#[test]
fn test_in_place_matches_copying() {
    for buf in sample_buffers() {
        let mut in_place = buf.clone();
        swap_red_blue(&mut in_place);
        assert_eq!(in_place, ColorConversion::RgbToBgr.apply(&buf));
    }
}

#[test]
fn test_frame_round_trip_through_orders() {
    for buf in sample_buffers() {
        let pixels = (buf.len() / 3) as u32;
        let frame = Frame::new(buf.clone(), pixels, 1, PixelOrder::Bgr);

        let rgb = frame.into_order(PixelOrder::Rgb);
        assert_eq!(rgb.order, PixelOrder::Rgb);
        assert_eq!(rgb.data.len(), buf.len());

        let bgr = rgb.into_order(PixelOrder::Bgr);
        assert_eq!(bgr.data, buf);
    }
}

#[test]
fn test_logical_colour_survives_conversion() {
    let frame = Frame::new(vec![10, 20, 30, 40, 50, 60], 2, 1, PixelOrder::Bgr);
    let before = (frame.rgb_at(0, 0), frame.rgb_at(1, 0));

    let converted = frame.into_order(PixelOrder::Rgb);

    assert_eq!((converted.rgb_at(0, 0), converted.rgb_at(1, 0)), before);
}
