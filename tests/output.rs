mod tests {
    use std::convert::Infallible;
    use std::sync::atomic::Ordering;
    use std::sync::{Arc, Mutex};

    use myrtio_strip_engine::{
        BLACK, ColorOrder, MockDriver, OutputDriver, OutputError, OutputSink, Rgb, StripConfig,
        output::{DeviceDriver, SmartLedsDriver},
    };
    use smart_leds::SmartLedsWrite;

    type Frames = Arc<Mutex<Vec<Vec<Rgb>>>>;

    struct Recorder(Frames);

    impl OutputDriver for Recorder {
        fn write(&mut self, colors: &[Rgb]) -> Result<(), OutputError> {
            self.0.lock().unwrap().push(colors.to_vec());
            Ok(())
        }
    }

    fn config(led_count: usize, color_order: ColorOrder) -> StripConfig {
        StripConfig {
            led_count,
            color_order,
            ..StripConfig::default()
        }
    }

    fn recording_sink(config: &StripConfig) -> (OutputSink, Frames) {
        let frames = Frames::default();
        let sink = OutputSink::new(config, Box::new(Recorder(Arc::clone(&frames))));
        (sink, frames)
    }

    #[test]
    fn test_strip_config_defaults() {
        let config = StripConfig::default();
        assert_eq!(config.led_count, 202);
        assert_eq!(config.gpio, 19);
        assert_eq!(config.dma, 10);
        assert_eq!(config.brightness, 255);
        assert_eq!(config.color_order, ColorOrder::Grb);
    }

    #[test]
    fn test_color_order_permutes_channels() {
        let color = Rgb::new(1, 2, 3);
        assert_eq!(ColorOrder::Rgb.apply(color), Rgb::new(1, 2, 3));
        assert_eq!(ColorOrder::Grb.apply(color), Rgb::new(2, 1, 3));
        assert_eq!(ColorOrder::Bgr.apply(color), Rgb::new(3, 2, 1));
        assert_eq!(ColorOrder::Gbr.apply(color), Rgb::new(2, 3, 1));
    }

    #[test]
    fn test_render_applies_brightness_and_order() {
        let mut config = config(2, ColorOrder::Grb);
        config.brightness = 128;
        let (mut sink, frames) = recording_sink(&config);

        sink.set_pixel(0, Rgb::new(200, 100, 0));
        sink.set_pixel(5, Rgb::new(9, 9, 9));
        sink.render().unwrap();

        let frames = frames.lock().unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0], [Rgb::new(50, 100, 0), BLACK]);
        assert_eq!(sink.pixels()[0], Rgb::new(200, 100, 0));
    }

    #[test]
    fn test_full_brightness_is_passthrough() {
        let (mut sink, frames) = recording_sink(&config(3, ColorOrder::Rgb));
        sink.fill(Rgb::new(7, 8, 9));
        sink.render().unwrap();
        assert_eq!(frames.lock().unwrap()[0], [Rgb::new(7, 8, 9); 3]);

        sink.set_brightness(0);
        sink.render().unwrap();
        assert_eq!(frames.lock().unwrap()[1], [BLACK; 3]);
    }

    #[test]
    fn test_set_all_ignores_wrong_length() {
        let (mut sink, _frames) = recording_sink(&config(3, ColorOrder::Rgb));
        sink.set_all(&[Rgb::new(1, 1, 1); 3]);
        sink.set_all(&[Rgb::new(9, 9, 9); 2]);
        assert_eq!(sink.pixels(), &[Rgb::new(1, 1, 1); 3]);
    }

    #[test]
    fn test_clear_blanks_strip() {
        let (mut sink, frames) = recording_sink(&config(2, ColorOrder::Rgb));
        sink.fill(Rgb::new(5, 5, 5));
        sink.clear().unwrap();
        assert_eq!(sink.pixels(), &[BLACK; 2]);
        assert_eq!(frames.lock().unwrap()[0], [BLACK; 2]);
    }

    #[test]
    fn test_open_falls_back_to_mock() {
        let config = config(4, ColorOrder::Grb);
        let sink = OutputSink::open(&config, |_| {
            Err(OutputError::Unavailable("no strip".into()))
        });
        assert!(sink.is_mock());
        assert_eq!(sink.led_count(), 4);

        let sink = OutputSink::open(&config, |config| {
            Ok(Box::new(MockDriver::new(config.led_count)) as Box<dyn OutputDriver>)
        });
        assert!(!sink.is_mock());
    }

    #[test]
    fn test_mock_driver_counts_frames() {
        let mut driver = MockDriver::new(4);
        let counter = driver.frame_counter();
        for _ in 0..3 {
            driver.write(&[BLACK; 4]).unwrap();
        }
        assert_eq!(counter.load(Ordering::Relaxed), 3);
    }

    #[cfg(unix)]
    fn make_fifo(path: &std::path::Path) {
        use std::os::unix::ffi::OsStrExt;

        let c_path = std::ffi::CString::new(path.as_os_str().as_bytes()).unwrap();
        // SAFETY: `c_path` is a valid NUL-terminated string
        assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) }, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_device_driver_fifo_without_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledstrip0");
        make_fifo(&path);

        let (done, result) = std::sync::mpsc::channel();
        let fifo = path.clone();
        std::thread::spawn(move || {
            let _ = done.send(DeviceDriver::open(&fifo).map(|_| ()));
        });
        let result = result
            .recv_timeout(std::time::Duration::from_secs(2))
            .expect("open must not block");
        assert!(matches!(result, Err(OutputError::Unavailable(_))));

        let sink = OutputSink::open(&config(4, ColorOrder::Rgb), |_| {
            DeviceDriver::open(&path).map(|driver| Box::new(driver) as Box<dyn OutputDriver>)
        });
        assert!(sink.is_mock());
    }

    #[cfg(unix)]
    #[test]
    fn test_device_driver_writes_raw_frames_to_fifo() {
        use std::io::Read;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledstrip0");
        make_fifo(&path);

        let fifo = path.clone();
        let reader = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            std::fs::File::open(fifo).unwrap().read_to_end(&mut bytes).unwrap();
            bytes
        });

        let mut driver = None;
        for _ in 0..200 {
            if let Ok(opened) = DeviceDriver::open(&path) {
                driver = Some(opened);
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        let mut driver = driver.expect("reader never attached");
        driver
            .write(&[Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)])
            .unwrap();
        driver.write(&[Rgb::new(7, 8, 9), BLACK]).unwrap();
        drop(driver);

        assert_eq!(
            reader.join().unwrap(),
            [1, 2, 3, 4, 5, 6, 7, 8, 9, 0, 0, 0]
        );
    }

    #[test]
    fn test_device_driver_rejects_regular_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = DeviceDriver::open(file.path());
        assert!(matches!(result, Err(OutputError::Unavailable(_))));
        assert_eq!(std::fs::metadata(file.path()).unwrap().len(), 0);
    }

    #[test]
    fn test_device_driver_missing_node() {
        let dir = tempfile::tempdir().unwrap();
        let result = DeviceDriver::open(&dir.path().join("ledstrip0"));
        assert!(matches!(result, Err(OutputError::Unavailable(_))));
    }

    #[derive(Default)]
    struct CollectingWriter(Vec<Rgb>);

    impl SmartLedsWrite for CollectingWriter {
        type Error = Infallible;
        type Color = Rgb;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
        where
            T: IntoIterator<Item = I>,
            I: Into<Self::Color>,
        {
            self.0 = iterator.into_iter().map(Into::into).collect();
            Ok(())
        }
    }

    #[test]
    fn test_smart_leds_adapter_forwards_frame() {
        let mut driver = SmartLedsDriver::new(CollectingWriter::default());
        driver.write(&[Rgb::new(1, 2, 3)]).unwrap();
        assert_eq!(driver.into_inner().0, [Rgb::new(1, 2, 3)]);
    }
}
