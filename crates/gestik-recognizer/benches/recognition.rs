use criterion::{criterion_group, criterion_main, Criterion};
use gestik_core::{GestureKind, Point};
use gestik_testing::GestureRobot;

fn tap_cycle(c: &mut Criterion) {
    let robot = GestureRobot::new();
    c.bench_function("tap_cycle", |b| {
        b.iter(|| {
            robot.tap(100.0, 100.0);
            robot.advance(400);
            robot.recorder().clear();
        })
    });
}

fn swipe_cycle(c: &mut Criterion) {
    let robot = GestureRobot::new();
    c.bench_function("swipe_cycle", |b| {
        b.iter(|| {
            robot.swipe(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 100);
            robot.advance(400);
            robot.recorder().clear();
        })
    });
}

fn pan_move_stream(c: &mut Criterion) {
    let robot = GestureRobot::new();
    let sink = std::rc::Rc::new(std::cell::Cell::new(0u64));
    let count = sink.clone();
    robot
        .recognizer()
        .subscribe(GestureKind::PanMove, move |_| count.set(count.get() + 1));

    c.bench_function("pan_move_stream", |b| {
        b.iter(|| {
            robot.recognizer().touch_start(&[Point::new(0.0, 0.0)]);
            for i in 0..32 {
                robot.recognizer().touch_move(&[Point::new(i as f32, 0.0)]);
            }
            robot.advance(100);
            robot.recognizer().touch_end(&[Point::new(31.0, 0.0)]);
            robot.recorder().clear();
        })
    });
}

criterion_group!(benches, tap_cycle, swipe_cycle, pan_move_stream);
criterion_main!(benches);
