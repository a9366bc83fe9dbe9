//! Property tests for engine invariants.
//!
//! Uses proptest to verify, over random candle paths and settings:
//! 1. Equity consistency: equity[i] replays exactly from fees and trade P&L
//! 2. At most one open position: trades never overlap
//! 3. Trade conservation: winners + losers + neutral == total == ledger length
//! 4. Drawdown / run-up bounds
//! 5. Forced close: only the last trade can end with reason `end`
//! 6. Determinism

use proptest::prelude::*;
use std::collections::HashMap;

use candlelab_core::{simulate, Candle, ExitReason, Settings, TradeType};

const BASE_TIME: i64 = 1_704_067_200;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_candles() -> impl Strategy<Value = Vec<Candle>> {
    prop::collection::vec(
        (-3.0..3.0_f64, -1.0..1.0_f64, 0.0..1.5_f64, 0.0..1.5_f64),
        2..150,
    )
    .prop_map(|steps| {
        let mut close = 100.0_f64;
        steps
            .iter()
            .enumerate()
            .map(|(i, &(step, body, up, down))| {
                // quarter-point grid so equal closes occur
                let next = (((close + step) * 4.0).round() / 4.0).max(1.0);
                let open = ((next - body) * 4.0).round() / 4.0;
                let candle = Candle::new(
                    BASE_TIME + i as i64 * 5 * 3600,
                    open,
                    open.max(next) + up,
                    open.min(next) - down,
                    next,
                );
                close = next;
                candle
            })
            .collect()
    })
}

fn arb_trade_type() -> impl Strategy<Value = TradeType> {
    prop_oneof![
        Just(TradeType::Long),
        Just(TradeType::Short),
        Just(TradeType::Both),
    ]
}

fn arb_settings() -> impl Strategy<Value = Settings> {
    (
        (any::<bool>(), any::<bool>(), 1usize..8, arb_trade_type()),
        (0.5..15.0_f64, 0.5..15.0_f64, 0.1..2.0_f64, 1.0..20.0_f64),
        (prop::option::of(0.0..3.0_f64), prop::option::of(0.0..1.0_f64)),
    )
        .prop_map(
            |(
                (use_obv, use_heikin_ashi, obv_period, trade_type),
                (stop_loss, take_profit, position_size, contract_value),
                (fee, spread),
            )| Settings {
                initial_capital: 10_000.0,
                position_size,
                asset: "PROP".into(),
                point_value: Some(1.0),
                contract_value: Some(contract_value),
                stop_loss,
                take_profit,
                trade_type,
                use_order_fee: fee.is_some(),
                order_fee: fee.unwrap_or(0.0),
                use_spread: spread.is_some(),
                spread_pips: spread.unwrap_or(0.0),
                use_obv,
                obv_period,
                use_heikin_ashi,
                ..Settings::default()
            },
        )
}

// ── Invariants ───────────────────────────────────────────────────────

proptest! {
    /// equity[i] == initial + Σ pnl(closed ≤ i) − fee × entries(≤ i),
    /// replayed in the same event order as the engine so the match is exact.
    #[test]
    fn equity_replays_exactly(candles in arb_candles(), settings in arb_settings()) {
        let result = simulate(&candles, &settings).unwrap();
        prop_assert_eq!(result.equity.len(), candles.len());
        prop_assert_eq!(result.equity[0], settings.initial_capital);

        let index_of: HashMap<i64, usize> =
            candles.iter().enumerate().map(|(i, c)| (c.time, i)).collect();
        let fee = if settings.use_order_fee { settings.order_fee } else { 0.0 };

        // (index, is_exit, amount): entry fee precedes the close on the same candle
        let mut events: Vec<(usize, bool, f64)> = Vec::new();
        for t in &result.trades {
            events.push((index_of[&t.entry_time], false, fee));
            events.push((index_of[&t.exit_time], true, t.pnl));
        }

        let mut capital = settings.initial_capital;
        let mut next = 0;
        for (i, &equity) in result.equity.iter().enumerate().skip(1) {
            while next < events.len() && events[next].0 <= i {
                let (_, is_exit, amount) = events[next];
                if is_exit { capital += amount } else { capital -= amount }
                next += 1;
            }
            prop_assert_eq!(equity, capital, "equity mismatch at candle {}", i);
        }
        prop_assert_eq!(result.final_capital, capital);
    }

    /// Trades never overlap and never re-enter on the candle that closed the previous one.
    #[test]
    fn at_most_one_open_position(candles in arb_candles(), settings in arb_settings()) {
        let result = simulate(&candles, &settings).unwrap();
        for t in &result.trades {
            prop_assert!(t.exit_time >= t.entry_time);
        }
        for pair in result.trades.windows(2) {
            prop_assert!(pair[1].entry_time > pair[0].exit_time);
        }
    }

    #[test]
    fn trade_conservation(candles in arb_candles(), settings in arb_settings()) {
        let r = simulate(&candles, &settings).unwrap();
        prop_assert_eq!(r.winning_trades + r.losing_trades + r.neutral_trades, r.total_trades);
        prop_assert_eq!(r.total_trades, r.trades.len());
        prop_assert!(r.win_rate >= 0.0 && r.win_rate <= 100.0);
        prop_assert!(r.time_in_market >= 0.0 && r.time_in_market <= 100.0);
        let held: usize = r.trades.iter().map(|t| t.bars_held).sum();
        prop_assert_eq!(r.time_in_market, held as f64 / candles.len() as f64 * 100.0);
    }

    #[test]
    fn drawdown_and_runup_bounds(candles in arb_candles(), settings in arb_settings()) {
        let r = simulate(&candles, &settings).unwrap();
        prop_assert!(r.max_drawdown <= 0.0);
        prop_assert!(r.max_runup >= 0.0);

        let hi = r.equity.iter().cloned().fold(f64::MIN, f64::max);
        let lo = r.equity.iter().cloned().fold(f64::MAX, f64::min);
        prop_assert!(-r.max_drawdown <= hi - lo);
        prop_assert!(r.max_runup <= hi - lo);

        // brute-force largest peak-to-later-trough decline
        let mut worst = 0.0_f64;
        for i in 0..r.equity.len() {
            for j in i..r.equity.len() {
                worst = worst.max(r.equity[i] - r.equity[j]);
            }
        }
        prop_assert!((-r.max_drawdown - worst).abs() < 1e-9);
    }

    #[test]
    fn forced_close_only_at_last_candle(candles in arb_candles(), settings in arb_settings()) {
        let r = simulate(&candles, &settings).unwrap();
        let last_time = candles.last().unwrap().time;
        for (k, t) in r.trades.iter().enumerate() {
            if t.exit_reason == ExitReason::End {
                prop_assert_eq!(k, r.trades.len() - 1);
                prop_assert_eq!(t.exit_time, last_time);
            }
        }
    }

    #[test]
    fn deterministic(candles in arb_candles(), settings in arb_settings()) {
        let a = simulate(&candles, &settings).unwrap();
        let b = simulate(&candles, &settings).unwrap();
        prop_assert_eq!(a, b);
    }
}
