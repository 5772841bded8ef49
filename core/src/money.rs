// core/src/money.rs

/// Renders an amount in minor units, e.g. `123450` in PHP as `₱1,234.50`.
pub fn format_minor_units(amount_cents: i64, currency_code: &str) -> String {
  let sign = if amount_cents < 0 { "-" } else { "" };
  let abs = amount_cents.unsigned_abs();
  let whole = (abs / 100).to_string();
  let cents = abs % 100;

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, ch) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(ch);
  }

  let prefix = match currency_code {
    "PHP" => "₱".to_string(),
    "USD" => "$".to_string(),
    other => format!("{} ", other),
  };
  format!("{}{}{}.{:02}", sign, prefix, grouped, cents)
}

/// Parses a decimal amount such as `"129.5"` or `"-3"` into minor units.
/// At most two decimals; `None` for anything else or for values outside `i64`.
pub fn parse_minor_units(amount: &str) -> Option<i64> {
  let amount = amount.trim();
  let (negative, digits) = match amount.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, amount),
  };
  let (whole, fraction) = match digits.split_once('.') {
    Some((whole, fraction)) => (whole, fraction),
    None => (digits, ""),
  };
  let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
  if whole.is_empty() || !all_digits(whole) || fraction.len() > 2 || !all_digits(fraction) {
    return None;
  }
  if digits.contains('.') && fraction.is_empty() {
    return None;
  }

  let cents = match fraction.len() {
    0 => 0,
    1 => fraction.parse::<i64>().ok()? * 10,
    _ => fraction.parse::<i64>().ok()?,
  };
  let magnitude = whole.parse::<i64>().ok()?.checked_mul(100)?.checked_add(cents)?;
  Some(if negative { -magnitude } else { magnitude })
}
