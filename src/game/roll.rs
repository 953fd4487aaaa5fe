use rand::Rng;

/// [lo, hi] 양 끝 포함 균등 정수
pub fn random_int<R: Rng>(lo: i32, hi: i32, rng: &mut R) -> i32 {
    if lo >= hi {
        return lo;
    }
    rng.gen_range(lo..=hi)
}

/// 같은 속성 카드 수(count)에 따라 위쪽으로 치우치는 정수
///
/// `bias = (count-1)/19 * range`, 결과는 `round(lo + base + bias - range/2)` 를 [lo, hi] 로 자른 값.
/// 반올림은 .5 에서 위로 올린다.
pub fn biased_random_int<R: Rng>(lo: i32, hi: i32, count: u32, rng: &mut R) -> i32 {
    if lo >= hi {
        return lo;
    }
    let range = hi - lo + 1;
    let base = random_int(0, range - 1, rng);
    let bias = (count as f64 - 1.0) / 19.0 * range as f64;
    let raw = lo as f64 + base as f64 + bias - range as f64 / 2.0;
    let rounded = (raw + 0.5).floor() as i32;
    rounded.clamp(lo, hi)
}

/// 0~100 (양 끝 포함) 굴림이 threshold 미만인지
pub fn percent_below<R: Rng>(threshold: u32, rng: &mut R) -> bool {
    (random_int(0, 100, rng) as u32) < threshold
}

/// 정수 나눗셈 올림 (음수가 아닌 값 전용)
pub fn ceil_div(value: i32, divisor: i32) -> i32 {
    if value <= 0 {
        return value / divisor;
    }
    (value + divisor - 1) / divisor
}
