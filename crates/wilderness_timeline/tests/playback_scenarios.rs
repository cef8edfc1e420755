//! End-to-end playback scenarios: position, event windows and layout

use std::sync::{Arc, Mutex};
use wilderness_timeline::{
    position, timestamps, Event, EventName, KeyframeSpec, PlaybackConfig, PlaybackOptions,
    QueuedShape, Shape, Timeline, TimelineConfig, TimelineError, Value,
};

fn shape(duration: f64) -> Shape {
    Shape::new([
        KeyframeSpec::new(0.0),
        KeyframeSpec::new(1.0).duration(duration),
    ])
    .unwrap()
}

fn record(timeline: &mut Timeline, name: EventName) -> Arc<Mutex<Vec<Event>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    timeline.subscribe(name, move |event| sink.lock().unwrap().push(event.clone()));
    log
}

fn times(events: &[Event]) -> Vec<f64> {
    events.iter().map(|e| e.at).collect()
}

#[test]
fn test_single_iteration_starts_once() {
    let opts = PlaybackOptions::new(100.0).started(0.0);
    assert_eq!(timestamps(&opts, 0.0, None, 1000.0), vec![0.0]);

    let mut timeline = Timeline::builder()
        .shape(shape(100.0))
        .playback(PlaybackConfig::default().started(0.0))
        .build()
        .unwrap();
    let log = record(&mut timeline, EventName::TimelineStart);

    timeline.sample_position(1000.0);
    timeline.collect_events();
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].name, EventName::TimelineStart);
    assert_eq!(log[0].at, 0.0);
}

#[test]
fn test_four_iterations_start_every_cycle() {
    let opts = PlaybackOptions::new(100.0).iterations(4.0).started(0.0);
    assert_eq!(
        timestamps(&opts, 0.0, None, 1000.0),
        vec![0.0, 100.0, 200.0, 300.0]
    );
}

#[test]
fn test_alternating_finishes_every_other_cycle() {
    let opts = PlaybackOptions::new(100.0)
        .alternate(true)
        .iterations(5.0)
        .started(500.0);
    assert_eq!(
        timestamps(&opts, 1.0, Some(500.0), 1000.0),
        vec![600.0, 800.0, 1000.0]
    );

    let mut timeline = Timeline::builder()
        .shape(shape(100.0))
        .playback(
            PlaybackConfig::default()
                .alternate(true)
                .iterations(5.0)
                .started(500.0),
        )
        .build()
        .unwrap();
    let log = record(&mut timeline, EventName::TimelineFinish);
    timeline.sample_position(1000.0);
    timeline.collect_events();
    assert_eq!(times(&log.lock().unwrap()), vec![600.0, 800.0, 1000.0]);
}

#[test]
fn test_negative_offset_overlaps_previous_shape() {
    let timeline = Timeline::builder()
        .queued(QueuedShape::new(shape(1000.0)).name("first"))
        .queued(QueuedShape::new(shape(1000.0)).name("second").queue(-500.0))
        .build()
        .unwrap();

    let first = timeline.shape("first").unwrap();
    let second = timeline.shape("second").unwrap();
    assert_eq!(timeline.duration(), 1500.0);
    assert!(second.start < first.end);
    assert!((first.end - second.start - 500.0 / timeline.duration()).abs() < 1e-9);
}

#[test]
fn test_collect_twice_without_time_passing_is_empty() {
    let mut timeline = Timeline::builder()
        .shape(shape(100.0))
        .playback(PlaybackConfig::default().iterations(f64::INFINITY))
        .build()
        .unwrap();
    for name in EventName::ALL {
        record(&mut timeline, name);
    }
    timeline.play(0.0, PlaybackConfig::default()).unwrap();

    timeline.sample_position(250.0);
    assert!(!timeline.collect_events().is_empty());
    timeline.sample_position(250.0);
    assert!(timeline.collect_events().is_empty());
}

#[test]
fn test_ticks_partition_events() {
    // Events seen tick by tick match one big window
    let build = || {
        Timeline::builder()
            .shape(shape(100.0))
            .shape(shape(300.0))
            .playback(
                PlaybackConfig::default()
                    .alternate(true)
                    .iterations(3.5)
                    .started(0.0),
            )
            .build()
            .unwrap()
    };

    let mut stepped = build();
    let stepped_log = record(&mut stepped, EventName::Keyframe);
    let mut at = 0.0;
    while at <= 2000.0 {
        stepped.sample_position(at);
        stepped.collect_events();
        at += 16.0;
    }

    let mut once = build();
    let once_log = record(&mut once, EventName::Keyframe);
    once.sample_position(2000.0);
    once.collect_events();

    let stepped_log = stepped_log.lock().unwrap();
    let once_log = once_log.lock().unwrap();
    assert!(!once_log.is_empty());
    assert_eq!(times(&stepped_log), times(&once_log));
}

#[test]
fn test_finished_timeline_goes_quiet() {
    let mut timeline = Timeline::builder()
        .shape(shape(100.0))
        .playback(PlaybackConfig::default().started(0.0))
        .build()
        .unwrap();
    let frames = record(&mut timeline, EventName::Frame);

    timeline.sample_position(50.0);
    timeline.collect_events();
    timeline.sample_position(150.0);
    timeline.collect_events();
    timeline.sample_position(300.0);
    timeline.collect_events();

    assert_eq!(times(&frames.lock().unwrap()), vec![50.0, 100.0]);
}

#[test]
fn test_position_stays_in_range() {
    let base = PlaybackOptions::new(120.0)
        .alternate(true)
        .reverse(true)
        .iterations(4.25)
        .initial_iterations(0.75)
        .delay(40.0);
    for started in [None, Some(0.0), Some(333.0)] {
        let opts = PlaybackOptions { started, ..base };
        for step in -10..200 {
            let p = position(&opts, f64::from(step) * 5.5);
            assert!((0.0..=1.0).contains(&p));
        }
    }
}

#[test]
fn test_configured_timeline_frames() {
    let config = TimelineConfig::from_json_str(
        r##"{
            "playback": { "duration": 1000, "started": 0 },
            "shapes": [
                {
                    "name": "swatch",
                    "keyframes": [
                        { "value": { "fill": "rgba(0,0,0,1)", "size": "0px" } },
                        { "value": { "fill": "rgba(255,255,255,0)", "size": "40px" } }
                    ]
                }
            ]
        }"##,
    )
    .unwrap();
    let timeline = config
        .builder(&Default::default())
        .unwrap()
        .build()
        .unwrap();

    let frame = timeline.frame(500.0).unwrap();
    assert_eq!(&*frame[0].name, "swatch");
    assert_eq!(
        frame[0].value,
        Value::map([
            ("fill", Value::from("rgba(128,128,128,0.5)")),
            ("size", Value::from("20px")),
        ])
    );
}

#[test]
fn test_construction_errors() {
    let err = Timeline::builder()
        .queued(QueuedShape::new(shape(100.0)).queue("nowhere"))
        .build()
        .unwrap_err();
    assert_eq!(err, TimelineError::ReferenceNotFound("nowhere".to_string()));

    let err = Timeline::builder()
        .shape(shape(100.0))
        .playback(PlaybackConfig::default().iterations(-1.0))
        .build()
        .unwrap_err();
    assert!(matches!(err, TimelineError::Validation(_)));
}
