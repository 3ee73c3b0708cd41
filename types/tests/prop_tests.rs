use proptest::prelude::*;
use rust_decimal::Decimal;

use exp_types::{
    decimal_from_amount, truncate_to_amount, AccountId, BurnRequest, Coin, Denom, MintRequest,
    RequestStatus, Timestamp,
};

fn status_strategy() -> impl Strategy<Value = RequestStatus> {
    prop::sample::select(RequestStatus::ALL.to_vec())
}

proptest! {
    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// is_past is the strict `start + period < now` comparison.
    #[test]
    fn timestamp_is_past_is_strict(
        start in 0u64..500_000,
        period in 1u64..500_000,
        offset in 0u64..1_000_000,
    ) {
        let t = Timestamp::new(start);
        let now = Timestamp::new(start + offset);
        prop_assert_eq!(t.is_past(period, now), offset > period);
    }

    /// Whole amounts survive the trip through Decimal unchanged.
    #[test]
    fn amount_decimal_roundtrip(amount in 0u128..(u64::MAX as u128)) {
        let d = decimal_from_amount(amount).unwrap();
        prop_assert_eq!(truncate_to_amount(d).unwrap(), amount);
    }

    /// Burn request bincode roundtrip.
    #[test]
    fn burn_request_bincode_roundtrip(
        amount in proptest::option::of(0u128..u128::MAX),
        secs in 0u64..u64::MAX,
        status in status_strategy(),
    ) {
        let request = BurnRequest {
            account: AccountId::new("craft1member").unwrap(),
            remaining_burn_amount: amount.map(|a| Coin::new(Denom::new("uexp").unwrap(), a)),
            requested_at: Timestamp::new(secs),
            status,
        };
        let encoded = bincode::serialize(&request).unwrap();
        let decoded: BurnRequest = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, request);
    }

    /// Mint request bincode roundtrip, including decimal scale.
    #[test]
    fn mint_request_bincode_roundtrip(
        left in 0i64..i64::MAX,
        minted in 0i64..i64::MAX,
        scale in 0u32..18,
        status in status_strategy(),
    ) {
        let request = MintRequest {
            account: AccountId::new("craft1member").unwrap(),
            remaining_dao_value: Decimal::new(left, scale),
            minted_value_token: Decimal::new(minted, scale),
            requested_at: Timestamp::new(1_700_000_000),
            status,
        };
        let encoded = bincode::serialize(&request).unwrap();
        let decoded: MintRequest = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, request);
    }
}
