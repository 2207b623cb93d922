/*!
Package scaled partitions into `tch` tensors
*/
use crate::data::scale::ScaledSeries;
use crate::*;
use num::NumCast;
use tch::Tensor;

/// Package every lookback sequence of a scaled partition into `(inputs, targets)` tensors of shape
/// `[sequences, lookback, features]` and `[sequences, 1]`
pub fn to_tensors<F>(scaled: &ScaledSeries<F>, lookback: usize) -> Result<(Tensor, Tensor)>
where
    F: Copy + NumCast,
{
    let features = scaled.features();
    let sequences = scaled.sequences(lookback)?;
    let rows = sequences.len();

    let mut input = Vec::<GpuFloat>::with_capacity(rows * lookback * features);
    let mut output = Vec::<GpuFloat>::with_capacity(rows);
    for (window, target) in sequences {
        for row in window {
            input.extend(row.iter().map(|&v| NumCast::from(v).unwrap_or(0.0)));
        }
        output.push(NumCast::from(*target).unwrap_or(0.0));
    }

    let input = Tensor::from_slice(&input).view([rows as i64, lookback as i64, features as i64]);
    let output = Tensor::from_slice(&output).view([rows as i64, 1]);
    Ok((input, output))
}
