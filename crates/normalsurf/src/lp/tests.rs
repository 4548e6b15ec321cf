use super::hadamard::{choose_int, LpIntKind};
use super::*;
use crate::int::exact_vec;
use crate::matching::FixedPeripheralCurves;
use crate::triangulation::catalog::*;
use std::sync::Arc;

fn start<C: LpConstraint, T: LpInt>(
    tri: &Triangulation,
    coords: NormalCoords,
) -> (LpInitialTableaux<C>, LpData<C, T>) {
    let init = LpInitialTableaux::<C>::new(tri, coords).unwrap();
    let lp = LpData::<C, T>::init_start::<BanNone>(&init).unwrap();
    (init, lp)
}

#[test]
fn smoke_single_quad_in_a_ball() {
    let (init, mut lp) = start::<LpConstraintNone, i64>(&one_tetrahedron(), NormalCoords::Quad);
    assert_eq!(init.rank(), 0);
    assert_eq!(init.columns(), 3);
    assert!(lp.is_feasible());
    lp.constrain_zero(1).unwrap();
    lp.constrain_zero(2).unwrap();
    lp.constrain_positive(0).unwrap();
    assert!(lp.is_feasible());
    assert_eq!(lp.extract_solution(&init).unwrap(), exact_vec(&[1, 0, 0]));
}

#[test]
fn zeroed_column_cannot_be_positive() {
    let (_, mut lp) = start::<LpConstraintNone, i64>(&figure_eight(), NormalCoords::Quad);
    lp.constrain_zero(4).unwrap();
    assert!(!lp.is_active(4));
    lp.constrain_positive(4).unwrap();
    assert!(!lp.is_feasible());
}

#[test]
fn column_layout_puts_quads_first() {
    let rp3 = layered_loop(2);
    let init =
        LpInitialTableaux::<LpConstraintEulerPositive>::new(&rp3, NormalCoords::Standard).unwrap();
    assert_eq!(init.coordinate_columns(), 14);
    assert_eq!(init.extra_columns(), 14..15);
    assert_eq!(init.quad_column(1, 2), 5);
    assert_eq!(init.triangle_column(1, 0), 10);
    assert!(init.has_triangles());
    assert_eq!(init.rank(), init.equations().rows() + 1);
}

fn octagon_sphere_in_s3<T: LpInt>() {
    let (init, mut lp) = start::<LpConstraintNone, T>(&layered_loop(1), NormalCoords::AlmostNormal);
    for v in 0..4 {
        lp.constrain_zero(init.triangle_column(0, v)).unwrap();
    }
    lp.constrain_zero(0).unwrap();
    lp.constrain_oct(1, 2).unwrap();
    assert!(lp.is_feasible());
    assert!(lp.octagon().is_some());
    let v = lp.extract_solution(&init).unwrap();
    assert_eq!(v, exact_vec(&[0, 0, 0, 0, 0, 0, 0, 1, 0, 0]));
}

#[test]
fn octagon_sphere_in_s3_native() {
    octagon_sphere_in_s3::<i64>();
}

#[test]
fn octagon_sphere_in_s3_exact() {
    octagon_sphere_in_s3::<ExactInt>();
}

#[test]
fn euler_positive_root_has_positive_euler_characteristic() {
    let tri = layered_loop(1);
    let (init, lp) = start::<LpConstraintEulerPositive, i128>(&tri, NormalCoords::Standard);
    assert!(lp.is_feasible());
    let v = lp.extract_solution(&init).unwrap();
    let eqns = make_matching_equations(&tri, NormalCoords::Standard).unwrap();
    assert!(eqns.is_satisfied_by(&v));
    let chi: ExactInt = euler_char_functional(&tri, NormalEncoding::new(NormalCoords::Standard))
        .unwrap()
        .iter()
        .zip(&v)
        .map(|(&c, x)| x * c)
        .sum();
    assert!(chi.is_positive());
}

#[test]
fn euler_positive_needs_triangles() {
    let err =
        LpInitialTableaux::<LpConstraintEulerPositive>::new(&layered_loop(1), NormalCoords::Quad);
    assert!(matches!(err, Err(Error::InvalidArgument(_))));
}

#[test]
fn non_spun_needs_peripheral_curves() {
    let mut tri = figure_eight();
    let err = LpInitialTableaux::<LpConstraintNonSpun>::new(&tri, NormalCoords::QuadClosed);
    assert!(matches!(err, Err(Error::FailedPrecondition(_))));
    tri.set_peripheral_curves(Arc::new(FixedPeripheralCurves::new(vec![[
        vec![1, 0, -1, 0, 0, 0],
        vec![0, 0, 0, 0, 0, 1],
    ]])));
    let (init, lp) = start::<LpConstraintNonSpun, ExactInt>(&tri, NormalCoords::QuadClosed);
    assert_eq!(init.extra_columns().len(), 2);
    assert!(lp.is_feasible());
    for c in init.extra_columns() {
        assert!(!lp.is_active(c));
    }
}

#[test]
fn boundary_ban_empties_a_ball() {
    let ball = one_tetrahedron();
    let init = LpInitialTableaux::<LpConstraintNone>::new(&ball, NormalCoords::Standard).unwrap();
    assert_eq!(BanBoundary::banned_columns(&init).unwrap().len(), 7);
    let mut lp = LpData::<LpConstraintNone, i64>::init_start::<BanBoundary>(&init).unwrap();
    assert!(lp.is_feasible());
    lp.constrain_positive(init.triangle_column(0, 0)).unwrap();
    assert!(!lp.is_feasible());
    let quad = LpInitialTableaux::<LpConstraintNone>::new(&ball, NormalCoords::Quad).unwrap();
    assert!(BanBoundary::banned_columns(&quad).is_err());
}

#[test]
fn small_searches_run_natively() {
    assert_eq!(choose_int(&figure_eight(), NormalCoords::Quad).unwrap(), LpIntKind::I64);
    assert_eq!(choose_int(&layered_loop(1), NormalCoords::AlmostNormal).unwrap(), LpIntKind::I64);
    assert_eq!(choose_int(&figure_eight(), NormalCoords::QuadClosed).unwrap(), LpIntKind::Exact);
}
