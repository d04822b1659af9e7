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

    if let Ok(mesh) = beamclip::clip_to_mesh(op, &subject, &clip) {
        assert!(mesh.strips.iter().all(|s| s.points.len() >= 3));
        assert!(mesh.area().is_finite());
    }
    let _ = beamclip::polygon_to_mesh(&subject);
});
