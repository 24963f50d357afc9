//! Whole-matrix arithmetic helpers.

use crate::element::{Element, ElementType};
use crate::matrix::Matrix;
use crate::{Error, with_element_type};

/// Square identity matrix. The diagonal is 255 for u8 and 1 for f32/f64; other
/// element types are rejected.
pub fn eye(n: usize, ty: ElementType) -> Result<Matrix, Error> {
    let diag = match ty {
        ElementType::U8 => 255.0,
        ElementType::F32 | ElementType::F64 => 1.0,
        _ => return Err(Error::UnsupportedType { op: "eye", ty }),
    };

    let mut m = Matrix::new(n, n, ty)?;
    with_element_type!(ty, T => {
        let mut view = m.view_mut::<T>()?;
        for i in 0..n {
            // SAFETY: `i < n` for both axes of an n x n view.
            unsafe { view.set_unchecked(i, i, 0, T::from_f64(diag)) };
        }
    });
    Ok(m)
}

/// Swaps rows and columns. Works for every shape and element type.
pub fn transpose(src: &Matrix) -> Result<Matrix, Error> {
    let (rows, cols) = (src.rows(), src.cols());
    if src.is_empty() {
        return Ok(Matrix::empty(src.element_type()));
    }

    with_element_type!(src.element_type(), T => {
        let view = src.view::<T>()?;
        let mut out = Vec::<T>::with_capacity(rows * cols);
        for x in 0..cols {
            for y in 0..rows {
                // SAFETY: `x < cols` and `y < rows` are the view bounds.
                out.push(unsafe { view.get_unchecked(x, y, 0) });
            }
        }
        Matrix::from_vec(cols, rows, out)
    })
}

pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix, Error> {
    zip_float(a, b, "add", |x, y| x + y)
}

pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix, Error> {
    zip_float(a, b, "subtract", |x, y| x - y)
}

fn zip_float(
    a: &Matrix,
    b: &Matrix,
    op: &'static str,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Matrix, Error> {
    if a.size() != b.size() {
        return Err(Error::SizeMismatch {
            expected: a.total(),
            actual: b.total(),
        });
    }
    if a.element_type() != b.element_type() {
        return Err(Error::TypeMismatch {
            requested: a.element_type(),
            actual: b.element_type(),
        });
    }

    match a.element_type() {
        ElementType::F32 => zip_typed::<f32>(a, b, f),
        ElementType::F64 => zip_typed::<f64>(a, b, f),
        ty => Err(Error::UnsupportedType { op, ty }),
    }
}

fn zip_typed<T: Element>(
    a: &Matrix,
    b: &Matrix,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Matrix, Error> {
    let (va, vb) = (a.view::<T>()?, b.view::<T>()?);
    let mut out = Vec::with_capacity(a.total());
    for y in 0..va.height() {
        out.extend(
            va.row(y)
                .iter()
                .zip(vb.row(y))
                .map(|(&p, &q)| T::from_f64(f(p.to_f64(), q.to_f64()))),
        );
    }
    Matrix::from_vec(a.rows(), a.cols(), out)
}

#[cfg(test)]
mod tests {
    use super::{add, eye, subtract, transpose};
    use crate::element::ElementType;
    use crate::matrix::Matrix;
    use crate::Error;

    #[test]
    fn eye_sets_type_specific_diagonal() {
        let m = eye(3, ElementType::U8).expect("u8 eye");
        assert_eq!(m.row::<u8>(1).expect("row"), &[0, 255, 0]);

        let f = eye(2, ElementType::F64).expect("f64 eye");
        assert_eq!(f.typed::<f64>().expect("f64"), &[1.0, 0.0, 0.0, 1.0]);

        assert_eq!(
            eye(2, ElementType::I16).unwrap_err(),
            Error::UnsupportedType {
                op: "eye",
                ty: ElementType::I16
            }
        );
    }

    #[test]
    fn transpose_handles_rectangular_inputs() {
        let m = Matrix::from_vec(2, 3, vec![1i16, 2, 3, 4, 5, 6]).expect("i16");
        let t = transpose(&m).expect("transpose");
        assert_eq!((t.rows(), t.cols()), (3, 2));
        assert_eq!(t.typed::<i16>().expect("i16"), &[1, 4, 2, 5, 3, 6]);
        assert_eq!(transpose(&t).expect("back"), m);
    }

    #[test]
    fn add_and_subtract_require_matching_float_buffers() {
        let a = Matrix::from_vec(1, 3, vec![1.0f32, 2.0, 3.0]).expect("f32");
        let b = Matrix::from_vec(1, 3, vec![0.5f32, 0.5, 0.5]).expect("f32");

        let s = add(&a, &b).expect("add");
        assert_eq!(s.typed::<f32>().expect("f32"), &[1.5, 2.5, 3.5]);
        let d = subtract(&a, &b).expect("subtract");
        assert_eq!(d.typed::<f32>().expect("f32"), &[0.5, 1.5, 2.5]);

        let short = Matrix::from_vec(1, 2, vec![0.0f32, 0.0]).expect("f32");
        assert!(matches!(add(&a, &short), Err(Error::SizeMismatch { .. })));

        let wide = a.convert(ElementType::F64).expect("f64");
        assert!(matches!(add(&a, &wide), Err(Error::TypeMismatch { .. })));

        let bytes = Matrix::from_vec(1, 3, vec![1u8, 2, 3]).expect("u8");
        assert_eq!(
            subtract(&bytes, &bytes).unwrap_err(),
            Error::UnsupportedType {
                op: "subtract",
                ty: ElementType::U8
            }
        );
    }
}
