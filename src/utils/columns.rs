use crate::utils::constants::{ADJUSTED_SUFFIX, QC_SUFFIX};

/// Quality-control companion of an observed quantity, e.g. `DOXY_QC`.
pub fn qc_column(variable: &str) -> String {
    format!("{}{}", variable, QC_SUFFIX)
}

/// Post-processing corrected variant of a quantity, e.g. `DOXY_ADJUSTED`.
pub fn adjusted_column(variable: &str) -> String {
    format!("{}{}", variable, ADJUSTED_SUFFIX)
}

pub fn measurement_column(variable: &str, adjusted: bool) -> String {
    if adjusted {
        adjusted_column(variable)
    } else {
        variable.to_string()
    }
}
