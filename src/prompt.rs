use crate::profile::FinancialProfile;

/// Persona and answer format the model is instructed to follow.
pub const SYSTEM_INSTRUCTION: &str = include_str!("system_instruction.md");

/// Build the user prompt describing one client.
pub fn build_prompt(profile: &FinancialProfile) -> String {
    format!(
        "請根據以下客戶資料進行專業財務診斷與規劃：\n\
         \n\
         **客戶資料：**\n\
         - 年齡：{age} 歲\n\
         - 每月收入：{income} 元\n\
         - 每月支出：{expenses} 元\n\
         - 總資產：{assets} 元\n\
         - 總負債：{liabilities} 元\n\
         - 主要財務目標：{goal}\n\
         - 風險承受度：{risk}\n\
         \n\
         請依照你的系統指令（Persona）進行分析，並給出強而有力的保險理財建議。\n",
        age = profile.age,
        income = format_amount(profile.monthly_income),
        expenses = format_amount(profile.monthly_expenses),
        assets = format_amount(profile.total_assets),
        liabilities = format_amount(profile.total_liabilities),
        goal = profile.financial_goal,
        risk = profile.risk_tolerance.label(),
    )
}

/// Format an amount with thousands separators and at most three decimals,
/// e.g. `1234567.5` becomes `1,234,567.5`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = (value * 1000.0).round() / 1000.0;
    let digits = format!("{:.3}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::new();
    if rounded < 0.0 {
        out.push('-');
    }
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}
