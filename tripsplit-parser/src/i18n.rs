#[cfg(all(feature = "ms", feature = "en"))]
compile_error!("Cannot enable both 'ms' and 'en' features at the same time");

#[cfg(feature = "ms")]
pub fn syntax_error_detail(error: impl std::fmt::Display) -> String {
    format!("ralat sintaks - {error}")
}

#[cfg(feature = "ms")]
pub fn syntax_error_unparsed_detail(input: impl std::fmt::Display) -> String {
    format!("ralat sintaks - input tidak dihurai: {input}")
}

#[cfg(feature = "ms")]
pub fn mixed_share_list_detail() -> String {
    "senarai peserta mencampurkan nama biasa, jumlah dan peratusan".to_string()
}

#[cfg(not(feature = "ms"))]
pub fn syntax_error_detail(error: impl std::fmt::Display) -> String {
    format!("syntax error - {error}")
}

#[cfg(not(feature = "ms"))]
pub fn syntax_error_unparsed_detail(input: impl std::fmt::Display) -> String {
    format!("syntax error - unparsed input: {input}")
}

#[cfg(not(feature = "ms"))]
pub fn mixed_share_list_detail() -> String {
    "participant list mixes plain names, amounts and percentages".to_string()
}
