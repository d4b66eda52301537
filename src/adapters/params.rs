use crate::error::SchoolDbError;
use crate::types::{ParamConverter, RowValues};

pub(crate) fn convert_params<'a, C>(
    params: &'a [RowValues],
) -> Result<<C as ParamConverter<'a>>::Converted, SchoolDbError>
where
    C: ParamConverter<'a>,
{
    C::convert_sql_params(params)
}

/// Every row of a batch must bind the same number of values.
pub(crate) fn check_uniform_arity(rows: &[Vec<RowValues>]) -> Result<usize, SchoolDbError> {
    let Some(first) = rows.first() else {
        return Ok(0);
    };
    let width = first.len();
    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
        return Err(SchoolDbError::ParameterError(format!(
            "batch row {idx} binds {} values, expected {width}",
            row.len()
        )));
    }
    Ok(width)
}
