use std::fs;
use std::path::PathBuf;

use mdl_renderer::script::Axis;
use mdl_renderer::{run, FileSink, Op, RecordingSink, RenderConfig, Script};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mdl_renderer_it_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn mesh_from_disk_is_drawn_and_saved() {
    let dir = scratch_dir("mesh");
    let obj = dir.join("tri.obj");
    fs::write(&obj, "v 100 100 0\nv 200 100 0\nv 150 200 0\nf 1 2 3\n").unwrap();
    let ppm = dir.join("still.ppm");

    let script = Script::new(vec![
        Op::Mesh { file: obj, constants: None, cs: None },
        Op::Save { file: ppm.clone() },
        Op::Display,
    ]);
    let mut sink = FileSink::new(dir.join("anim"), 30, false);
    let summary = run(&script, &RenderConfig::default(), &mut sink).unwrap();
    assert!(!summary.animated);

    let text = fs::read_to_string(&ppm).unwrap();
    assert!(text.starts_with("P3\n500 500\n255\n"));
    // still images never touch the animation directory
    assert!(!dir.join("anim").exists());

    let mut recording = RecordingSink::default();
    run(&script, &RenderConfig::default(), &mut recording).unwrap();
    assert!(recording.displayed[0].is_drawn(150, 130));
    assert!(!recording.displayed[0].is_drawn(50, 50));
}

#[test]
fn animation_writes_numbered_frames_and_a_gif() {
    let dir = scratch_dir("anim");
    let script = Script::new(vec![
        Op::Frames { count: 3 },
        Op::Basename { name: "spin".into() },
        Op::Vary { knob: "turn".into(), start_frame: 0, end_frame: 2, start_value: 0.0, end_value: 1.0 },
        Op::Move { xyz: [32.0, 32.0, 0.0], knob: None },
        Op::Rotate { axis: Axis::Z, degrees: 90.0, knob: Some("turn".into()) },
        Op::Box { corner: [-10.0, 10.0, 10.0], size: [20.0, 20.0, 20.0], constants: None, cs: None },
    ]);
    let config = RenderConfig {
        width: 64,
        height: 64,
        output_dir: dir.clone(),
        ..RenderConfig::default()
    };
    let mut sink = FileSink::new(config.output_dir.clone(), config.animation_delay_ms, false);
    run(&script, &config, &mut sink).unwrap();

    for name in ["spin000.png", "spin001.png", "spin002.png"] {
        let frame = image::open(dir.join(name)).unwrap().to_rgb8();
        assert_eq!(frame.dimensions(), (64, 64));
    }
    let gif = fs::read(dir.join("spin.gif")).unwrap();
    assert_eq!(&gif[..6], b"GIF89a");
}
