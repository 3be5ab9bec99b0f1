use std::time::Duration;

use bird_archer::timer::Ticker;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn first_firing_is_one_period_out() {
    let t = Ticker::new(ms(1500));
    assert_eq!(t.period(), ms(1500));
    assert_eq!(t.until_next(), ms(1500));
}

#[test]
fn consume_fires_exactly_on_deadline_and_rearms() {
    let mut t = Ticker::new(ms(100));
    assert!(!t.consume(ms(60)));
    assert_eq!(t.until_next(), ms(40));
    assert!(t.consume(ms(40)));
    assert_eq!(t.until_next(), ms(100));
}

#[test]
fn consuming_nothing_never_fires() {
    let mut t = Ticker::new(ms(100));
    assert!(!t.consume(Duration::ZERO));
    assert_eq!(t.until_next(), ms(100));
}

#[test]
fn zero_period_is_bumped() {
    let t = Ticker::new(Duration::ZERO);
    assert_eq!(t.period(), ms(1));
}
