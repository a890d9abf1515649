use super::*;

#[test]
fn first_tick_is_immediate_then_one_period_apart() {
    let start = Instant::now();
    let mut t = FrameTicker::starting_at(Fps::new(50, 1).unwrap(), start);
    assert_eq!(t.period(), Duration::from_millis(20));

    assert_eq!(t.advance(start), Duration::ZERO);
    assert_eq!(t.advance(start), Duration::from_millis(20));
    assert_eq!(
        t.advance(start + Duration::from_millis(25)),
        Duration::from_millis(15)
    );
}

#[test]
fn falling_behind_reanchors_schedule() {
    let start = Instant::now();
    let mut t = FrameTicker::starting_at(Fps::new(50, 1).unwrap(), start);
    assert_eq!(t.advance(start), Duration::ZERO);

    let late = start + Duration::from_millis(500);
    assert_eq!(t.advance(late), Duration::ZERO);
    assert_eq!(t.advance(late), Duration::from_millis(20));
}

#[test]
fn wait_counts_ticks_and_paces() {
    let mut t = FrameTicker::new(Fps::new(200, 1).unwrap());
    let start = Instant::now();
    for expected in 0..4 {
        assert_eq!(t.wait(), expected);
    }
    assert_eq!(t.ticks(), 4);
    assert!(start.elapsed() >= Duration::from_millis(15));
}
