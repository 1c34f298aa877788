use std::error::Error;

use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use tokio_util::bytes;

use crate::error::DialectTableError;
use crate::types::RowValues;

/// Container for Postgres parameters with lifetime tracking
pub struct Params<'a> {
    references: Vec<&'a (dyn ToSql + Sync)>,
}

impl<'a> Params<'a> {
    /// Borrow a slice of `RowValues` as Postgres parameters for a statement whose parameter
    /// types are `types` (as reported by `Statement::params`).
    ///
    /// # Errors
    ///
    /// Returns `DialectTableError::ParameterError` when an integer does not fit the width of
    /// its parameter.
    pub fn convert(
        params: &'a [RowValues],
        types: &[Type],
    ) -> Result<Params<'a>, DialectTableError> {
        check_int_widths(params, types)?;
        let mut references = Vec::with_capacity(params.len());
        for p in params {
            references.push(p as &(dyn ToSql + Sync));
        }
        Ok(Params { references })
    }

    /// Get a reference to the underlying parameter array
    #[must_use]
    pub fn as_refs(&self) -> &[&(dyn ToSql + Sync)] {
        &self.references
    }
}

/// Reject integers that would overflow an `int2`/`int4` parameter before anything is sent.
///
/// # Errors
///
/// Returns `DialectTableError::ParameterError` naming the offending placeholder.
pub fn check_int_widths(params: &[RowValues], types: &[Type]) -> Result<(), DialectTableError> {
    for (idx, (value, ty)) in params.iter().zip(types).enumerate() {
        let RowValues::Int(i) = value else {
            continue;
        };
        let fits = match *ty {
            Type::INT2 => i16::try_from(*i).is_ok(),
            Type::INT4 => i32::try_from(*i).is_ok(),
            _ => true,
        };
        if !fits {
            return Err(DialectTableError::ParameterError(format!(
                "value {i} for ${} does not fit {}",
                idx + 1,
                ty.name()
            )));
        }
    }
    Ok(())
}

impl ToSql for RowValues {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut bytes::BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            // Integer columns are narrowed to the parameter's declared width.
            RowValues::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
                _ => (*i).to_sql(ty, out),
            },
            RowValues::Float(f) => match *ty {
                #[allow(clippy::cast_possible_truncation)]
                Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                _ => (*f).to_sql(ty, out),
            },
            RowValues::Text(s) => s.to_sql(ty, out),
            RowValues::Bool(b) => (*b).to_sql(ty, out),
            RowValues::Timestamp(dt) => dt.to_sql(ty, out),
            RowValues::Null => Ok(IsNull::Yes),
            RowValues::JSON(jsval) => jsval.to_sql(ty, out),
            RowValues::Blob(bytes) => bytes.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::BOOL
                | Type::TIMESTAMP
                | Type::JSON
                | Type::JSONB
                | Type::BYTEA
        )
    }

    to_sql_checked!();
}
