use contracts::dashboards::d402_shared_dashboard::MetricFormat;

/// Форматирует число с разделителями тысяч (точками)
///
/// # Примеры
/// ```
/// use backend::shared::format::format_number;
/// assert_eq!(format_number(1234567), "1.234.567");
/// assert_eq!(format_number(42), "42");
/// assert_eq!(format_number(0), "0");
/// ```
pub fn format_number(n: usize) -> String {
    group_digits(&n.to_string(), '.')
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(separator);
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Rounds `|value|` to `decimals` places and splits it into
/// (is_negative, integer digits, fraction digits).
fn split_fixed(value: f64, decimals: u32) -> (bool, String, String) {
    let value = if value.is_finite() { value } else { 0.0 };
    let factor = 10f64.powi(decimals as i32);
    let scaled = (value.abs() * factor).round();
    let negative = value < 0.0 && scaled > 0.0;

    let scaled = scaled as u128;
    let divisor = 10u128.pow(decimals);
    let int_part = (scaled / divisor).to_string();
    let frac_part = if decimals == 0 {
        String::new()
    } else {
        format!("{:0width$}", scaled % divisor, width = decimals as usize)
    };
    (negative, int_part, frac_part)
}

/// Locale conventions for rendering metric values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleFormat {
    pub currency_symbol: String,
    pub decimal_separator: char,
    pub thousands_separator: char,
}

impl Default for LocaleFormat {
    /// Brazilian Portuguese, BRL
    fn default() -> Self {
        Self {
            currency_symbol: "R$".to_string(),
            decimal_separator: ',',
            thousands_separator: '.',
        }
    }
}

impl LocaleFormat {
    /// `1234.6` → `1.235`
    pub fn integer(&self, value: f64) -> String {
        let (negative, int_part, _) = split_fixed(value, 0);
        let grouped = group_digits(&int_part, self.thousands_separator);
        if negative {
            format!("-{grouped}")
        } else {
            grouped
        }
    }

    /// Grouped number with at most two fraction digits: `1234.5` → `1.234,5`
    pub fn decimal(&self, value: f64) -> String {
        let (negative, int_part, frac_part) = split_fixed(value, 2);
        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&group_digits(&int_part, self.thousands_separator));
        let frac = frac_part.trim_end_matches('0');
        if !frac.is_empty() {
            out.push(self.decimal_separator);
            out.push_str(frac);
        }
        out
    }

    /// `600.0` → `R$ 600,00`
    pub fn currency(&self, value: f64) -> String {
        let (negative, int_part, frac_part) = split_fixed(value, 2);
        format!(
            "{}{} {}{}{}",
            if negative { "-" } else { "" },
            self.currency_symbol,
            group_digits(&int_part, self.thousands_separator),
            self.decimal_separator,
            frac_part
        )
    }

    /// Ratio rendered as percent with one decimal: `0.125` → `12.5%`
    pub fn percentage(&self, value: f64) -> String {
        let value = if value.is_finite() { value } else { 0.0 };
        format!("{:.1}%", value * 100.0)
    }

    /// Rendering used for built-in metrics and variables.
    pub fn format(&self, value: f64, format: MetricFormat) -> String {
        match format {
            MetricFormat::Currency => self.currency(value),
            MetricFormat::Percentage => self.percentage(value),
            MetricFormat::Number => self.integer(value),
        }
    }

    /// Rendering used for calculation results: plain numbers keep two decimals.
    pub fn format_calculation(&self, value: f64, format: MetricFormat) -> String {
        match format {
            MetricFormat::Number => self.decimal(value),
            other => self.format(value, other),
        }
    }
}
