use super::*;
use crate::foundation::core::Canvas;
use std::f64::consts::FRAC_PI_2;
use std::time::Duration;
use tokio::time::Instant;

fn animator() -> (Animator, Arc<SceneStore>) {
    let (scene, writer) = SceneStore::new(Canvas::default());
    let a = Animator::new(MotionProfile::default(), Arc::clone(&scene), writer);
    (a, scene)
}

#[tokio::test(start_paused = true)]
async fn zero_length_move_snaps_and_draws_nothing() {
    let (mut a, scene) = animator();
    a.process(Command::new(320.0, 240.0, 320.0, 240.0)).await;

    let pose = scene.pose();
    assert_eq!(pose.position, Point::new(320.0, 240.0));
    assert_eq!(pose.orientation, 0.0);
    assert_eq!(pose.completed, 1);
    assert_eq!(pose.phase, Phase::Idle);
    assert!(scene.segments(Layer::Robot).is_empty());
    assert!(scene.segments(Layer::Commanded).is_empty());
}

#[tokio::test(start_paused = true)]
async fn final_pose_is_exact_for_fractional_targets() {
    let (mut a, scene) = animator();
    let cmd = Command::new(333.7, 101.3, 320.0, 240.0);
    a.process(cmd).await;

    let pose = scene.pose();
    assert_eq!(pose.position, Point::new(333.7, 101.3));
    assert_eq!(pose.orientation, (101.3_f64 - 240.0).atan2(333.7 - 320.0));
    assert!(pose.pen_down);
    assert_eq!(a.pose(), pose);
}

#[tokio::test(start_paused = true)]
async fn pen_down_move_appends_robot_segment() {
    let (mut a, scene) = animator();
    a.process(Command::new(100.0, 300.0, 320.0, 240.0)).await;

    let robot = scene.segments(Layer::Robot);
    assert_eq!(robot.len(), 1);
    assert_eq!(robot[0].from, Point::new(320.0, 240.0));
    assert_eq!(robot[0].to, Point::new(100.0, 300.0));
}

#[tokio::test(start_paused = true)]
async fn distant_start_triggers_pen_up_reposition() {
    let (mut a, scene) = animator();
    a.process(Command::new(200.0, 100.0, 100.0, 100.0)).await;

    let robot = scene.segments(Layer::Robot);
    assert_eq!(robot.len(), 1, "reposition leg must not leave a trace");
    assert_eq!(robot[0].from, Point::new(100.0, 100.0));
    assert_eq!(robot[0].to, Point::new(200.0, 100.0));
    let pose = scene.pose();
    assert_eq!(pose.position, Point::new(200.0, 100.0));
    assert_eq!(pose.orientation, 0.0);
}

#[tokio::test(start_paused = true)]
async fn start_within_threshold_skips_reposition() {
    let (mut a, scene) = animator();
    let started = Instant::now();
    // 0.5 px off the robot: no reposition, straight 200 px drive to the right.
    a.process(Command::new(520.0, 240.0, 320.5, 240.0)).await;

    assert_eq!(started.elapsed(), Duration::from_millis(900));
    assert_eq!(scene.pose().position, Point::new(520.0, 240.0));
}

#[tokio::test(start_paused = true)]
async fn straight_move_takes_one_tick_per_step() {
    let (mut a, _scene) = animator();
    let started = Instant::now();
    a.process(Command::new(520.0, 240.0, 320.0, 240.0)).await;
    // No rotation (already facing +x), 200 px / 20 px = 10 steps of 100 ms.
    assert_eq!(started.elapsed(), Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn half_turn_rotates_in_two_degree_steps() {
    let (mut a, scene) = animator();
    let started = Instant::now();
    // Facing +x, move straight left: 180 degrees of rotation, 0 translation steps (< 20 px).
    a.process(Command::new(310.0, 240.0, 320.0, 240.0)).await;

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(9000), "{elapsed:?}");
    assert!(elapsed <= Duration::from_millis(9100), "{elapsed:?}");
    assert_eq!(scene.pose().orientation, std::f64::consts::PI);
}

/// Faces straight up (-90 degrees in canvas space), then returns a move heading 170 degrees.
async fn face_up_then_down_left(a: &mut Animator) -> Command {
    a.process(Command::new(320.0, 200.0, 320.0, 240.0)).await;
    let heading = 170.0_f64.to_radians();
    Command {
        target: Point::new(320.0 + 100.0 * heading.cos(), 200.0 + 100.0 * heading.sin()),
        previous: Point::new(320.0, 200.0),
    }
}

#[tokio::test(start_paused = true)]
async fn rotation_turns_through_raw_heading_difference() {
    let (mut a, scene) = animator();
    let cmd = face_up_then_down_left(&mut a).await;

    let started = Instant::now();
    assert!(a.process(cmd).await);
    let elapsed = started.elapsed();

    // 260 degrees / 2 = 130 rotation steps, then about 100 px / 20 = 5 translation steps.
    assert!(elapsed >= Duration::from_millis(13_400), "{elapsed:?}");
    assert!(elapsed <= Duration::from_millis(13_600), "{elapsed:?}");
    assert_eq!(scene.pose().position, cmd.target);
    assert_eq!(scene.pose().orientation, cmd.heading());
}

#[tokio::test(start_paused = true)]
async fn shortest_arc_profile_turns_the_other_way() {
    let (scene, writer) = SceneStore::new(Canvas::default());
    let mut a = Animator::new(
        MotionProfile {
            shortest_arc: true,
            ..MotionProfile::default()
        },
        Arc::clone(&scene),
        writer,
    );
    let cmd = face_up_then_down_left(&mut a).await;

    let mut poses = scene.subscribe();
    poses.borrow_and_update();
    let started = Instant::now();
    let turn = tokio::spawn(async move {
        a.process(cmd).await;
    });
    poses.changed().await.unwrap();
    // First step goes counter-clockwise from -90 degrees.
    assert!(poses.borrow().orientation < -FRAC_PI_2);
    turn.await.unwrap();

    // 100 degrees / 2 = 50 rotation steps plus 5 translation steps.
    let elapsed = started.elapsed();
    assert!(elapsed <= Duration::from_millis(5_600), "{elapsed:?}");
    assert_eq!(scene.pose().position, cmd.target);
}

#[tokio::test(start_paused = true)]
async fn shutdown_interrupts_move_within_one_step() {
    use crate::command::channel::command_channel;

    let (scene, writer) = SceneStore::new(Canvas::default());
    let a = Animator::new(MotionProfile::default(), Arc::clone(&scene), writer);
    let (tx, rx) = command_channel();
    let shutdown = Shutdown::new();
    let task = tokio::spawn(a.run(rx, shutdown.clone()));

    // 20 000 px straight right: 1000 steps, 100 s of simulated time.
    tx.enqueue(Command::new(20_320.0, 240.0, 320.0, 240.0))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(250)).await;

    let stopped_at = Instant::now();
    shutdown.trigger();
    task.await.unwrap();
    assert!(stopped_at.elapsed() <= Duration::from_millis(100));

    let pose = scene.pose();
    assert_eq!(pose.completed, 0);
    assert_eq!(pose.phase, Phase::Translating);
    assert!(pose.position.x > 320.0 && pose.position.x < 20_320.0);
    assert!(scene.segments(Layer::Robot).is_empty());
}

#[tokio::test(start_paused = true)]
async fn run_skips_queue_when_already_stopped() {
    use crate::command::channel::command_channel;

    let (scene, writer) = SceneStore::new(Canvas::default());
    let a = Animator::new(MotionProfile::default(), Arc::clone(&scene), writer);
    let (tx, rx) = command_channel();
    let shutdown = Shutdown::new();
    shutdown.trigger();
    tx.enqueue(Command::new(520.0, 240.0, 320.0, 240.0)).unwrap();

    // Already stopped: the queued command is never started.
    a.run(rx, shutdown).await;
    assert_eq!(scene.pose().completed, 0);
    assert_eq!(scene.pose().position, Point::new(320.0, 240.0));
}

#[tokio::test(start_paused = true)]
async fn run_processes_queue_in_order_and_stops_on_shutdown() {
    use crate::command::channel::command_channel;

    let (scene, writer) = SceneStore::new(Canvas::default());
    let a = Animator::new(
        MotionProfile {
            step_ms: 0,
            ..MotionProfile::default()
        },
        Arc::clone(&scene),
        writer,
    );
    let (tx, rx) = command_channel();
    let shutdown = Shutdown::new();
    let task = tokio::spawn(a.run(rx, shutdown.clone()));

    let pts = [
        Point::new(320.0, 240.0),
        Point::new(400.0, 240.0),
        Point::new(400.0, 300.0),
        Point::new(350.0, 350.0),
    ];
    for w in pts.windows(2) {
        tx.enqueue(Command {
            target: w[1],
            previous: w[0],
        })
        .unwrap();
    }

    let mut rx = scene.subscribe();
    rx.wait_for(|p| p.completed == 3).await.unwrap();
    shutdown.trigger();
    task.await.unwrap();

    let robot = scene.segments(Layer::Robot);
    let drawn: Vec<_> = robot.iter().map(|s| (s.from, s.to)).collect();
    assert_eq!(
        drawn,
        vec![(pts[0], pts[1]), (pts[1], pts[2]), (pts[2], pts[3])]
    );
}
