use crate::audio::features::IntensityMatrix;
use crate::error::{Result, SpectrogramError};

/// Box-filter resampling of the time axis to `target_width` columns.
///
/// Input column `j` covers `[j/N, (j+1)/N)` and output column `i` covers
/// `[i/M, (i+1)/M)`; each output cell is the overlap-weighted mean of the
/// input cells it covers, truncated to an integer. The intervals are kept
/// in integer units of `1/(N*M)` so equal widths reproduce the input exactly.
pub fn resample(matrix: &IntensityMatrix, target_width: usize) -> Result<IntensityMatrix> {
    if target_width == 0 {
        return Err(SpectrogramError::config("target width must be positive"));
    }

    let n = matrix.width() as u64;
    let m = target_width as u64;
    let height = matrix.height();
    let mut acc = vec![0u64; height];
    let mut columns = Vec::with_capacity(target_width);

    for i in 0..m {
        let new_start = i * n;
        let new_end = new_start + n;
        acc.iter_mut().for_each(|a| *a = 0);

        // input columns whose span can intersect this output column
        let first = new_start / m;
        let last = (new_end.div_ceil(m)).min(n);
        for j in first..last {
            let old_start = j * m;
            let old_end = old_start + m;
            let overlap = old_end.min(new_end).saturating_sub(old_start.max(new_start));
            if overlap == 0 {
                continue;
            }
            for (a, &v) in acc.iter_mut().zip(matrix.column(j as usize)) {
                *a += overlap * v as u64;
            }
        }

        // overlaps of one output column sum to n
        columns.push(acc.iter().map(|&a| (a / n) as u8).collect());
    }

    IntensityMatrix::from_columns(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(columns: Vec<Vec<u8>>) -> IntensityMatrix {
        IntensityMatrix::from_columns(columns).unwrap()
    }

    fn pattern(width: usize, height: usize) -> IntensityMatrix {
        matrix(
            (0..width)
                .map(|x| (0..height).map(|y| ((x * 37 + y * 11) % 256) as u8).collect())
                .collect(),
        )
    }

    #[test]
    fn same_width_is_identity() {
        for width in [1, 3, 7, 100, 333] {
            let m = pattern(width, 5);
            assert_eq!(resample(&m, width).unwrap(), m);
        }
    }

    #[test]
    fn halving_averages_pairs() {
        let m = matrix(vec![vec![10, 0], vec![20, 255], vec![0, 1], vec![255, 2]]);
        let out = resample(&m, 2).unwrap();
        assert_eq!(out.columns(), &[vec![15, 127], vec![127, 1]]);
    }

    #[test]
    fn doubling_repeats_columns() {
        let m = matrix(vec![vec![1, 2], vec![3, 4]]);
        let out = resample(&m, 4).unwrap();
        assert_eq!(out.columns(), &[vec![1, 2], vec![1, 2], vec![3, 4], vec![3, 4]]);
    }

    #[test]
    fn uneven_ratio_weights_by_overlap() {
        // 3 -> 2: output 0 = 2/3 * a + 1/3 * b
        let m = matrix(vec![vec![30], vec![60], vec![90]]);
        let out = resample(&m, 2).unwrap();
        assert_eq!(out.columns(), &[vec![40], vec![80]]);
    }

    #[test]
    fn output_stays_within_row_bounds() {
        let m = pattern(97, 16);
        for target in [1, 13, 50, 96, 98, 250] {
            let out = resample(&m, target).unwrap();
            assert_eq!(out.width(), target);
            assert_eq!(out.height(), 16);
            for row in 0..16 {
                let values: Vec<u8> = (0..97).map(|c| m.get(c, row)).collect();
                let lo = *values.iter().min().unwrap();
                let hi = *values.iter().max().unwrap();
                for c in 0..target {
                    let v = out.get(c, row);
                    assert!(v >= lo && v <= hi, "target {} row {} col {}", target, row, c);
                }
            }
        }
    }

    #[test]
    fn constant_rows_survive_any_width() {
        let m = matrix(vec![vec![200, 7]; 45]);
        for target in [1, 2, 44, 46, 1000] {
            let out = resample(&m, target).unwrap();
            assert!(out.columns().iter().all(|c| c == &vec![200, 7]));
        }
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = resample(&pattern(4, 4), 0).unwrap_err();
        assert!(matches!(err, SpectrogramError::Configuration(_)));
    }
}
