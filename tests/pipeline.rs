use std::f32::consts::PI;

use sonogram::audio::precomputed;
use sonogram::{
    colorize_channels, colorize_matrix, compute_spectrogram, resample, ColorMap, FftPlan,
    SpectrogramError, WindowKind, WindowSpec,
};

fn tone(len: usize, bin: usize, frame_length: usize, amplitude: f32) -> Vec<f32> {
    (0..len)
        .map(|i| amplitude * (2.0 * PI * bin as f32 * i as f32 / frame_length as f32).sin())
        .collect()
}

#[test]
fn silence_renders_white() {
    for kind in WindowKind::ALL {
        let m = compute_spectrogram(&[0.0; 1024], 44100, 512, None, WindowSpec::new(kind), None)
            .unwrap();
        assert_eq!(m.height(), 256);
        assert!(m.columns().iter().flatten().all(|&v| v == 0), "{}", kind);
    }
}

#[test]
fn frame_length_must_be_a_power_of_two() {
    let samples = vec![0.0; 4096];
    let err = compute_spectrogram(&samples, 44100, 100, None, WindowSpec::default(), None)
        .unwrap_err();
    assert!(matches!(err, SpectrogramError::InvalidInput(_)));

    let m = compute_spectrogram(&samples, 44100, 8, None, WindowSpec::default(), None).unwrap();
    assert_eq!(m.height(), 4);
}

#[test]
fn unknown_window_is_a_configuration_error() {
    let err = WindowSpec::parse(Some("triangle"), None).unwrap_err();
    assert!(matches!(err, SpectrogramError::Configuration(_)));
    assert!(!err.is_recoverable());
}

#[test]
fn empty_input_is_recoverable() {
    let err = compute_spectrogram(&[], 44100, 512, None, WindowSpec::default(), None).unwrap_err();
    assert!(err.is_recoverable());
}

#[test]
fn target_width_sets_column_count() {
    let samples = tone(44100, 64, 512, 100.0);
    for width in [1, 100, 300, 1000] {
        let m = compute_spectrogram(&samples, 44100, 512, None, WindowSpec::default(), Some(width))
            .unwrap();
        assert_eq!(m.width(), width);
        assert_eq!(m.height(), 256);
    }
}

#[test]
fn tone_shows_up_in_its_row() {
    let frame_length = 256;
    let samples = tone(frame_length * 20, 40, frame_length, 100.0);
    let m = compute_spectrogram(&samples, 8000, frame_length, Some(0), WindowSpec::default(), None)
        .unwrap();
    let plan = FftPlan::new(frame_length, 8000, WindowSpec::default()).unwrap();
    assert!((plan.bin_frequency(40) - 1250.0).abs() < 1e-3);
    for column in m.columns() {
        let loudest = (0..column.len()).max_by_key(|&b| column[b]).unwrap();
        assert!(loudest.abs_diff(40) <= 1);
    }

    let px = colorize_matrix(&m, None);
    assert_eq!((px.width as usize, px.height as usize), (m.width(), 128));
    // row 0 is the top of the image, the highest bin
    let row = 127 - 40;
    assert!(px.pixel(0, row as u32)[0] < px.pixel(0, 0)[0]);
}

#[test]
fn resampling_to_the_same_width_is_exact() {
    let samples = tone(8192, 10, 512, 50.0);
    let m = compute_spectrogram(&samples, 44100, 512, Some(256), WindowSpec::default(), None)
        .unwrap();
    assert_eq!(resample(&m, m.width()).unwrap(), m);
}

#[test]
fn precomputed_payload_renders_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");

    let samples = tone(4096, 20, 256, 80.0);
    let left = compute_spectrogram(&samples, 22050, 256, None, WindowSpec::default(), None).unwrap();
    let right = compute_spectrogram(&[0.0; 4096], 22050, 256, None, WindowSpec::default(), None)
        .unwrap();
    let channels = vec![left, right];

    std::fs::write(&path, precomputed::to_json(&channels).unwrap()).unwrap();
    let loaded = precomputed::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded, channels);

    let px = colorize_channels(&loaded, &ColorMap::default()).unwrap();
    assert_eq!(px.height, 256);
    assert_eq!(px.data.len(), px.bytes_per_row() * 256);

    let png = dir.path().join("out.png");
    px.save_png(&png).unwrap();
    assert!(png.exists());
}
