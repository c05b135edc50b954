use portal_view::{
    error::ViewerError,
    math::{
        Matrix3, Vector3, add, add_into, invert, mult_matrix_vector, mult_vector_matrix, multiply,
        transpose, transpose_into,
    },
};

const EPSILON: f32 = 1e-5;

fn samples() -> Vec<Matrix3> {
    vec![
        Matrix3::IDENTITY,
        Matrix3::ZERO,
        Matrix3::from_rows([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]),
        Matrix3::from_rows([2.0, -3.0, 1.0], [2.0, 0.0, -1.0], [1.0, 4.0, 5.0]),
        Matrix3::from_rows([0.5, 0.0, -7.25], [13.0, -1.5, 0.0], [0.0, 2.0, 0.125]),
        Matrix3::from_axis_angle(Vector3::new(1.0, 2.0, 3.0), 0.7),
    ]
}

fn vectors() -> Vec<Vector3> {
    vec![
        Vector3::ZERO,
        Vector3::UNIT_X,
        Vector3::new(1.0, -2.0, 3.5),
        Vector3::new(-0.25, 8.0, 0.0),
    ]
}

#[test]
fn should_transpose_twice_to_original() {
    for a in samples() {
        let mut b = a;
        transpose(&mut b);
        transpose(&mut b);
        assert_eq!(b, a);

        let mut t = Matrix3::ZERO;
        transpose_into(&mut t, &a);
        assert_eq!(t.transposed(), a);
    }
}

#[test]
fn should_transpose_off_diagonal_only() {
    let a = Matrix3::from_rows([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]);
    let mut b = a;
    transpose(&mut b);
    assert_eq!(b.rows(), [[1.0, 4.0, 7.0], [2.0, 5.0, 8.0], [3.0, 6.0, 9.0]]);
}

#[test]
fn should_add_consistently_in_place_and_into() {
    for a in samples() {
        for b in samples() {
            let mut c = Matrix3::ZERO;
            add_into(&mut c, &a, &b);

            let mut in_place = a;
            add(&mut in_place, &b);

            assert_eq!(c, in_place);
            assert_eq!(a + b, c);
        }
    }
}

#[test]
fn should_return_output_reference_for_chaining() {
    let mut c = Matrix3::ZERO;
    let a = Matrix3::IDENTITY;
    add(add_into(&mut c, &a, &a), &a);
    assert_eq!(c.rows(), [[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]]);
}

#[test]
fn should_leave_vector_unchanged_under_identity() {
    for v in vectors() {
        let mut u = Vector3::new(9.0, 9.0, 9.0);
        mult_matrix_vector(&mut u, &Matrix3::IDENTITY, &v);
        assert_eq!(u, v);
        assert_eq!(Matrix3::IDENTITY * v, v);
    }
}

#[test]
fn should_match_vector_times_matrix_with_transpose() {
    for m in samples() {
        for v in vectors() {
            let expected = m.transposed() * v;

            let mut u = Vector3::ZERO;
            mult_vector_matrix(&mut u, &v, &m);
            assert!(u.approx_eq(expected, EPSILON), "{u:?} != {expected:?}");
            assert!((v * m).approx_eq(expected, EPSILON));
        }
    }
}

#[test]
fn should_use_a12_for_third_component_of_vector_times_matrix() {
    let m = Matrix3::from_rows([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]);
    assert_eq!(Vector3::UNIT_Y * m, Vector3::UNIT_Z);
    assert_eq!(Vector3::UNIT_Z * m, Vector3::ZERO);
}

#[test]
fn should_multiply_row_by_column() {
    let a = Matrix3::from_rows([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]);
    let b = Matrix3::from_rows([9.0, 8.0, 7.0], [6.0, 5.0, 4.0], [3.0, 2.0, 1.0]);
    let mut c = Matrix3::ZERO;
    multiply(&mut c, &a, &b);
    assert_eq!(
        c.rows(),
        [[30.0, 24.0, 18.0], [84.0, 69.0, 54.0], [138.0, 114.0, 90.0]]
    );
    assert_eq!(a * b, c);
}

#[test]
fn should_invert_known_matrix() {
    let a = Matrix3::from_rows([2.0, -3.0, 1.0], [2.0, 0.0, -1.0], [1.0, 4.0, 5.0]);
    let mut inv = Matrix3::ZERO;
    invert(&mut inv, &a).unwrap();

    let mut product = Matrix3::ZERO;
    multiply(&mut product, &a, &inv);
    assert!(product.approx_eq(&Matrix3::IDENTITY, EPSILON), "{product:?}");
    assert!((inv * a).approx_eq(&Matrix3::IDENTITY, EPSILON));
}

#[test]
fn should_invert_rotation_to_its_transpose() {
    let r = Matrix3::from_axis_angle(Vector3::new(0.0, 1.0, 1.0), 1.1);
    let inv = r.inverse().unwrap();
    assert!(inv.approx_eq(&r.transposed(), EPSILON));
}

#[test]
fn should_reject_singular_matrix() {
    let singular = Matrix3::from_rows([1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 0.0]);
    for m in [Matrix3::ZERO, singular] {
        let result = m.inverse();
        assert!(matches!(
            result,
            Err(ViewerError::UnsupportedOperation {
                operation: "invert",
                ..
            })
        ));
    }
}

#[test]
fn should_rotate_counter_clockwise_about_axis() {
    let r = Matrix3::from_axis_angle(Vector3::UNIT_Z, std::f32::consts::FRAC_PI_2);
    assert!((r * Vector3::UNIT_X).approx_eq(Vector3::UNIT_Y, EPSILON));
    assert!((r.determinant() - 1.0).abs() < EPSILON);
    assert_eq!(Matrix3::from_axis_angle(Vector3::ZERO, 1.0), Matrix3::IDENTITY);
}

#[test]
fn should_convert_to_cgmath_by_columns() {
    let a = Matrix3::from_rows([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]);
    let m: cgmath::Matrix3<f32> = a.into();
    assert_eq!(m.x, cgmath::Vector3::new(1.0, 4.0, 7.0));
    let v = Vector3::new(1.0, -1.0, 2.0);
    let expected: Vector3 = (m * cgmath::Vector3::from(v)).into();
    assert!((a * v).approx_eq(expected, EPSILON));
}

#[test]
fn should_do_vector_arithmetic() {
    let a = Vector3::new(1.0, 2.0, 3.0);
    let b = Vector3::new(-2.0, 0.5, 1.0);
    assert_eq!(a + b, Vector3::new(-1.0, 2.5, 4.0));
    assert_eq!(a - b, Vector3::new(3.0, 1.5, 2.0));
    assert_eq!(-a, Vector3::new(-1.0, -2.0, -3.0));
    assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
    assert_eq!(a.dot(b), -2.0 + 1.0 + 3.0);
    assert_eq!(Vector3::UNIT_X.cross(Vector3::UNIT_Y), Vector3::UNIT_Z);
    assert!((Vector3::new(3.0, 4.0, 0.0).normalize().length() - 1.0).abs() < EPSILON);
    assert_eq!(Vector3::ZERO.normalize(), Vector3::ZERO);
}
