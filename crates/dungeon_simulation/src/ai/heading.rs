//! Yaw math для behavior FSM
//!
//! Конвенция: yaw = поворот вокруг Y, yaw = 0 смотрит вдоль +Z,
//! направление на точку = atan2(dx, dz).

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;

/// Угол → (-π, π]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut angle = angle % TAU;
    if angle <= -PI {
        angle += TAU;
    } else if angle > PI {
        angle -= TAU;
    }
    angle
}

/// Heading от `from` к `to` в плоскости XZ, [0, 2π)
pub fn heading_to(from: Vec3, to: Vec3) -> f32 {
    let heading = (to.x - from.x).atan2(to.z - from.z).rem_euclid(TAU);
    // rem_euclid может вернуть ровно TAU для крошечных отрицательных углов
    if heading >= TAU {
        0.0
    } else {
        heading
    }
}

/// Heading по направлению движения (None - стоим на месте)
pub fn heading_along(velocity: Vec3) -> Option<f32> {
    let planar = Vec2::new(velocity.x, velocity.z);
    if planar.length_squared() <= f32::EPSILON {
        return None;
    }
    Some(planar.x.atan2(planar.y))
}

/// Поворот к target фиксированным шагом `rate` по кратчайшей дуге.
///
/// Внутри dead zone (`|diff| <= dead_zone`) yaw не меняется.
pub fn turn_toward(yaw: f32, target: f32, rate: f32, dead_zone: f32) -> f32 {
    let diff = normalize_angle(yaw - target);
    if diff.abs() <= dead_zone {
        return yaw;
    }
    normalize_angle(yaw - rate * diff.signum())
}

/// Blend к desired: за тик проходит долю `factor` кратчайшей дуги.
///
/// Интерполируется разность углов, нормализованная в (-π, π], а не сырые
/// значения yaw. Поэтому через границу ±π поворот идёт коротким путём
/// (3.0 → -3.0 проходит через π, а не через 0).
pub fn blend_toward(yaw: f32, desired: f32, factor: f32) -> f32 {
    normalize_angle(yaw + normalize_angle(desired - yaw) * factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(PI) - PI).abs() < EPS);
        assert!((normalize_angle(-PI) - PI).abs() < EPS);
        assert!((normalize_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < EPS);
        assert!((normalize_angle(-5.0 * PI / 2.0) + PI / 2.0).abs() < EPS);
        assert!(normalize_angle(0.0).abs() < EPS);
    }

    #[test]
    fn test_heading_to_is_in_zero_tau() {
        let origin = Vec3::ZERO;
        assert!(heading_to(origin, Vec3::new(0.0, 0.0, 5.0)).abs() < EPS);
        assert!((heading_to(origin, Vec3::new(5.0, 0.0, 0.0)) - PI / 2.0).abs() < EPS);
        // -X → 3π/2, не -π/2
        assert!((heading_to(origin, Vec3::new(-5.0, 0.0, 0.0)) - 3.0 * PI / 2.0).abs() < EPS);
        // Y игнорируется
        assert!(heading_to(origin, Vec3::new(0.0, 40.0, 5.0)).abs() < EPS);
    }

    #[test]
    fn test_turn_steps_by_fixed_rate_along_short_arc() {
        // target чуть "левее" через границу ±π: кратчайший путь - вверх через π
        let yaw = 3.0;
        let target = -3.0 + TAU; // = 3.283..., [0, 2π) представление
        let next = turn_toward(yaw, target, 0.04, 0.02);
        assert!((next - 3.04).abs() < EPS);

        let yaw = 0.5;
        let next = turn_toward(yaw, 0.0, 0.04, 0.02);
        assert!((next - 0.46).abs() < EPS);
    }

    #[test]
    fn test_turn_wraps_into_half_open_range() {
        let next = turn_toward(PI - 0.01, PI + 1.0, 0.04, 0.02);
        assert!(next <= PI && next > -PI);
        assert!((next - (-PI + 0.03)).abs() < 1e-4);
    }

    #[test]
    fn test_turn_idempotent_inside_dead_zone() {
        let yaw = 1.0;
        assert_eq!(turn_toward(yaw, 1.015, 0.04, 0.02), yaw);
        assert_eq!(turn_toward(yaw, 1.0 - 0.02, 0.04, 0.02), yaw);
    }

    #[test]
    fn test_turn_converges_without_oscillation() {
        let target = 2.0;
        let mut yaw = 0.0;
        for _ in 0..200 {
            yaw = turn_toward(yaw, target, 0.04, 0.02);
        }
        assert!((yaw - target).abs() <= 0.02 + EPS);

        // Дальше yaw не двигается
        let settled = yaw;
        for _ in 0..10 {
            yaw = turn_toward(yaw, target, 0.04, 0.02);
        }
        assert_eq!(yaw, settled);
    }

    #[test]
    fn test_blend_toward_moves_fraction_of_arc() {
        let next = blend_toward(0.0, 1.0, 0.05);
        assert!((next - 0.05).abs() < EPS);

        // Через границу ±π - кратчайшая дуга
        let next = blend_toward(3.0, -3.0, 0.5);
        assert!(next > 3.0 || next < -3.0 + 0.3);
    }

    #[test]
    fn test_blend_toward_never_takes_long_way_across_pi() {
        // Дуга 3.0 → -3.0 через π равна 2π - 6 ≈ 0.283
        let arc = TAU - 6.0;
        let next = blend_toward(3.0, -3.0, 0.05);
        assert!((next - (3.0 + arc * 0.05)).abs() < EPS, "yaw = {}", next);

        // И в обратную сторону
        let next = blend_toward(-3.0, 3.0, 0.05);
        assert!((next - (-3.0 - arc * 0.05)).abs() < EPS, "yaw = {}", next);

        // Сходится к desired, не пересекая 0
        let mut yaw = 3.0;
        for _ in 0..500 {
            yaw = blend_toward(yaw, -3.0, 0.05);
            assert!(yaw.abs() > 2.9, "yaw = {}", yaw);
        }
        assert!((yaw - -3.0).abs() < 1e-3);
    }

    #[test]
    fn test_heading_along_velocity() {
        assert_eq!(heading_along(Vec3::ZERO), None);
        assert_eq!(heading_along(Vec3::new(0.0, 3.0, 0.0)), None);
        let yaw = heading_along(Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert!((yaw - PI / 2.0).abs() < EPS);
    }
}
