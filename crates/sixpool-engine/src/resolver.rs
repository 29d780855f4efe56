//! The resolver: turns a pool size and settings into a [`RollResult`].

use chrono::Utc;
use tracing::debug;

use crate::dice::{Die, DieSource, MAX_EDGE, MAX_POOL, MIN_POOL, RollResult, SIDES};
use crate::error::{EngineError, EngineResult};
use crate::glitch::GlitchType;
use crate::settings::Settings;

/// Check that a pool size and Edge balance are within the allowed ranges.
pub fn validate_request(pool_size: u32, edge_points: u32) -> EngineResult<()> {
    if !(MIN_POOL..=MAX_POOL).contains(&pool_size) {
        return Err(EngineError::InvalidPoolSize(pool_size));
    }
    if edge_points > u32::from(MAX_EDGE) {
        return Err(EngineError::InvalidEdgeAmount(edge_points));
    }
    Ok(())
}

/// Validate the request, then resolve it with [`perform_roll`].
pub fn roll_checked<R: DieSource + ?Sized>(
    pool_size: u32,
    edge_points: u32,
    settings: &Settings,
    rng: &mut R,
) -> EngineResult<RollResult> {
    validate_request(pool_size, edge_points)?;
    let edge = u8::try_from(edge_points).map_err(|_| EngineError::InvalidEdgeAmount(edge_points))?;
    Ok(perform_roll(pool_size, edge, settings, rng))
}

/// Roll `pool_size` dice and classify the result.
///
/// The caller guarantees `1 <= pool_size <= 99` and `edge_points <= 7`;
/// use [`roll_checked`] when the inputs come from a user.
pub fn perform_roll<R: DieSource + ?Sized>(
    pool_size: u32,
    edge_points: u8,
    settings: &Settings,
    rng: &mut R,
) -> RollResult {
    let mut dice: Vec<Die> = (0..pool_size).map(|_| Die::original(rng.roll_d6())).collect();

    let sixes = dice.iter().filter(|d| d.is_six()).count() as u32;
    if settings.rule_of_six {
        explode(&mut dice, sixes, rng);
    }

    let glitch = if settings.glitch_detection {
        settings.glitch_rule.classify(&dice)
    } else {
        GlitchType::None
    };

    let mut result = RollResult {
        dice,
        hits: 0,
        ones: 0,
        glitch,
        dice_pool: pool_size,
        edge_points,
        bought_success: false,
        bought_hits: 0,
        timestamp: Utc::now(),
    };
    result.recount();

    debug!(
        pool = pool_size,
        hits = result.hits,
        exploded = result.exploded_count(),
        glitch = %result.glitch,
        "resolved roll"
    );
    result
}

/// Run a Rule of Six cascade for `sixes` pending sixes.
///
/// Each pending six draws one exploded die; an exploded six queues one more.
/// Returns the number of dice appended.
pub(crate) fn explode<R: DieSource + ?Sized>(dice: &mut Vec<Die>, sixes: u32, rng: &mut R) -> u32 {
    let mut pending = sixes;
    let mut appended = 0;
    while pending > 0 {
        pending -= 1;
        let value = rng.roll_d6();
        dice.push(Die::exploded(value));
        appended += 1;
        if value == SIDES {
            pending += 1;
        }
    }
    appended
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::glitch::GlitchRule;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn no_explode() -> Settings {
        Settings::default().with_rule_of_six(false)
    }

    #[test]
    fn validate_bounds() {
        assert!(validate_request(1, 0).is_ok());
        assert!(validate_request(99, 7).is_ok());
        assert_eq!(
            validate_request(0, 0),
            Err(EngineError::InvalidPoolSize(0))
        );
        assert_eq!(
            validate_request(100, 0),
            Err(EngineError::InvalidPoolSize(100))
        );
        assert_eq!(
            validate_request(5, 8),
            Err(EngineError::InvalidEdgeAmount(8))
        );
    }

    #[test]
    fn roll_checked_rejects_before_drawing() {
        let mut dice = ScriptedDice::new([6]);
        let err = roll_checked(0, 0, &Settings::default(), &mut dice).unwrap_err();
        assert_eq!(err, EngineError::InvalidPoolSize(0));
        assert_eq!(dice.drawn(), 0);
    }

    #[test]
    fn scripted_pool_without_explosions() {
        let mut dice = ScriptedDice::new([6, 5, 3, 1]);
        let r = perform_roll(4, 2, &no_explode(), &mut dice);
        assert_eq!(r.dice.len(), 4);
        assert_eq!(r.hits, 2);
        assert_eq!(r.ones, 1);
        assert_eq!(r.dice_pool, 4);
        assert_eq!(r.edge_points, 2);
        assert_eq!(r.glitch, GlitchType::None);
    }

    #[test]
    fn sixes_explode_and_chain() {
        // pool: 6, 2 ; cascade: 6 -> 6 -> 3
        let mut dice = ScriptedDice::new([6, 2, 6, 6, 3]);
        let r = perform_roll(2, 0, &Settings::default(), &mut dice);
        let values: Vec<u8> = r.dice.iter().map(|d| d.value).collect();
        assert_eq!(values, vec![6, 2, 6, 6, 3]);
        assert_eq!(r.exploded_count(), 3);
        assert_eq!(r.dice_pool, 2);
        assert_eq!(r.hits, 3);
        assert!(r.dice[2..].iter().all(|d| d.exploded && !d.original));
    }

    #[test]
    fn long_run_of_sixes_terminates() {
        let mut script = vec![6; 500];
        script.push(2);
        let mut dice = ScriptedDice::new(script);
        let r = perform_roll(1, 0, &Settings::default(), &mut dice);
        // 1 original six + 499 exploded sixes + the closing 2
        assert_eq!(r.dice.len(), 501);
        assert_eq!(r.exploded_count(), 500);
        assert_eq!(r.hits, 500);
    }

    #[test]
    fn critical_glitch_on_all_ones() {
        let mut dice = ScriptedDice::new([1]);
        let r = perform_roll(4, 0, &Settings::default(), &mut dice);
        assert_eq!(r.glitch, GlitchType::CriticalGlitch);
    }

    #[test]
    fn glitch_detection_off() {
        let mut dice = ScriptedDice::new([1]);
        let settings = Settings::default().with_glitch_detection(false);
        let r = perform_roll(4, 0, &settings, &mut dice);
        assert_eq!(r.glitch, GlitchType::None);
        assert_eq!(r.ones, 4);
    }

    #[test]
    fn alternate_glitch_rule_applies() {
        let settings = Settings::default()
            .with_rule_of_six(false)
            .with_glitch_rule(GlitchRule::OnesExceedHits);
        let mut dice = ScriptedDice::new([1, 1, 5, 3, 3, 3]);
        let r = perform_roll(6, 0, &settings, &mut dice);
        assert_eq!(r.glitch, GlitchType::Glitch);
    }

    #[test]
    fn exploded_ones_do_not_glitch() {
        // pool: 6, 1, 4 ; cascade: 1
        let mut dice = ScriptedDice::new([6, 1, 4, 1]);
        let r = perform_roll(3, 0, &Settings::default(), &mut dice);
        assert_eq!(r.ones, 2);
        assert_eq!(r.glitch, GlitchType::None);
    }

    #[test]
    fn seeded_rolls_are_reproducible() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        let ra = perform_roll(12, 0, &Settings::default(), &mut a);
        let rb = perform_roll(12, 0, &Settings::default(), &mut b);
        assert_eq!(ra.dice, rb.dice);
    }

    proptest! {
        #[test]
        fn without_rule_of_six_every_die_is_original(pool in 1u32..=99, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let r = perform_roll(pool, 0, &no_explode(), &mut rng);
            prop_assert_eq!(r.dice.len(), pool as usize);
            prop_assert!(r.dice.iter().all(|d| d.original && !d.exploded));
            prop_assert!(r.dice.iter().all(|d| (1..=6).contains(&d.value)));
        }

        #[test]
        fn hits_match_dice(pool in 1u32..=99, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let r = perform_roll(pool, 0, &Settings::default(), &mut rng);
            prop_assert_eq!(r.hits, r.dice.iter().filter(|d| d.value >= 5).count() as u32);
            prop_assert_eq!(r.dice_pool, pool);
            prop_assert_eq!(r.originals().count(), pool as usize);
        }

        #[test]
        fn every_explosion_traces_to_a_six(pool in 1u32..=99, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let r = perform_roll(pool, 0, &Settings::default(), &mut rng);
            let sixes = r.dice.iter().filter(|d| d.is_six()).count();
            // each six queues exactly one draw, so exploded dice == sixes
            prop_assert_eq!(r.exploded_count(), sixes);
            prop_assert!(r.dice[..pool as usize].iter().all(|d| d.original));
        }

        #[test]
        fn rule_of_six_never_lowers_hits(pool in 1u32..=99, seed in any::<u64>()) {
            let mut off_rng = StdRng::seed_from_u64(seed);
            let mut on_rng = StdRng::seed_from_u64(seed);
            let off = perform_roll(pool, 0, &no_explode(), &mut off_rng);
            let on = perform_roll(pool, 0, &Settings::default(), &mut on_rng);
            prop_assert_eq!(&off.dice[..], &on.dice[..pool as usize]);
            prop_assert!(on.hits >= off.hits);
        }

        #[test]
        fn glitch_classification_matches_formula(pool in 1u32..=20, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let r = perform_roll(pool, 0, &Settings::default(), &mut rng);
            let ones = r.originals().filter(|d| d.is_one()).count() as u32;
            let expected = if ones == pool {
                GlitchType::CriticalGlitch
            } else if ones > pool / 2 && ones > 0 {
                GlitchType::Glitch
            } else {
                GlitchType::None
            };
            prop_assert_eq!(r.glitch, expected);
        }
    }
}
