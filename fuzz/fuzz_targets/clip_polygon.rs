#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(op) = beamclip::arbitrary::binary_op(&mut u) else {
        return;
    };
    let Ok(subject) = beamclip::arbitrary::polygon(4, &mut u) else {
        return;
    };
    let Ok(clip) = beamclip::arbitrary::polygon(4, &mut u) else {
        return;
    };

    // Inconsistent inputs are allowed to fail, but not to panic.
    if let Ok(out) = beamclip::clip_to_polygon(op, &subject, &clip) {
        for c in &out.contours {
            assert!(c.len() >= 3);
            assert!(c.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        }
        assert!(out.contours.windows(2).all(|w| w[0].is_hole <= w[1].is_hole));
    }
});
