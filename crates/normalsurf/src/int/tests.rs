use super::*;
use num_bigint::BigInt;
use proptest::prelude::*;

#[test]
fn smoke_native_overflow_promotes() {
    let a = ExactInt::from(i64::MAX);
    let b = &a + &ExactInt::ONE;
    assert!(!b.is_native());
    assert_eq!(b.to_i128(), Some(i64::MAX as i128 + 1));
    let c = b - ExactInt::ONE;
    assert!(c.is_native());
    assert_eq!(c, a);
}

#[test]
fn smoke_min_negation_and_abs() {
    let m = ExactInt::from(i64::MIN);
    let n = -&m;
    assert_eq!(n.to_i128(), Some(-(i64::MIN as i128)));
    assert_eq!(m.abs(), n);
    assert_eq!((-n), m);
}

#[test]
fn gcd_and_scale_down() {
    let mut v = exact_vec(&[6, 0, 9, 15]);
    let g = scale_down(&mut v);
    assert_eq!(g, ExactInt::from(3));
    assert_eq!(v, exact_vec(&[2, 0, 3, 5]));
    assert_eq!(scale_down(&mut v), ExactInt::ONE);
    let mut z = exact_vec(&[0, 0]);
    assert_eq!(scale_down(&mut z), ExactInt::ZERO);
}

#[test]
fn ordering_mixes_widths() {
    let big = ExactInt::from(BigInt::from(i64::MAX) * 4);
    let small = ExactInt::from(-5);
    assert!(small < big);
    assert!(-&big < small);
    assert_eq!(big.signum(), 1);
}

#[test]
fn serde_roundtrip_through_strings() {
    let v = vec![ExactInt::from(3), ExactInt::from(BigInt::from(u64::MAX) * 7)];
    let s = serde_json::to_string(&v).unwrap();
    let back: Vec<ExactInt> = serde_json::from_str(&s).unwrap();
    assert_eq!(back, v);
    assert!("12x".parse::<ExactInt>().is_err());
}

#[test]
fn narrow_lp_ints_report_overflow() {
    let a: i64 = i64::MAX;
    assert!(matches!(a.try_add(&1), Err(crate::Error::IntegerOverflow("i64"))));
    let b: i128 = i64::MAX as i128;
    assert_eq!(b.try_add(&1).unwrap(), i64::MAX as i128 + 1);
    assert_eq!(<i64 as LpInt>::cross(&3, &4, &2, &5).unwrap(), 2);
    let e = ExactInt::from(i64::MAX);
    assert!(e.try_mul(&e).is_ok());
}

proptest! {
    #[test]
    fn exact_matches_i128(a in any::<i64>(), b in any::<i64>()) {
        let x = ExactInt::from(a);
        let y = ExactInt::from(b);
        prop_assert_eq!((&x + &y).to_i128(), Some(a as i128 + b as i128));
        prop_assert_eq!((&x - &y).to_i128(), Some(a as i128 - b as i128));
        prop_assert_eq!((&x * &y).to_i128(), Some(a as i128 * b as i128));
        if b != 0 {
            prop_assert_eq!((&x / &y).to_i128(), Some(a as i128 / b as i128));
            prop_assert_eq!((&x % &y).to_i128(), Some(a as i128 % b as i128));
        }
        prop_assert_eq!(x.cmp(&y), a.cmp(&b));
    }
}
