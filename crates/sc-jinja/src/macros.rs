//! dbt placeholder text

/// `{{ ref('model') }}`
pub fn ref_macro(model: &str) -> String {
    format!("{{{{ ref('{}') }}}}", quote_arg(model))
}

/// `{{ source('group', 'table') }}`
pub fn source_macro(group: &str, table: &str) -> String {
    format!(
        "{{{{ source('{}', '{}') }}}}",
        quote_arg(group),
        quote_arg(table)
    )
}

fn quote_arg(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
