use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Display fallbacks for the generation parameters.
///
/// The backend owns the real values; these are only shown when `/config`
/// leaves a field out, and seed the form before the first load.
#[derive(Debug, Clone, Copy)]
pub struct ConfigDefaults {
    pub model: &'static str,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: i64,
    pub max_output_tokens: i64,
    pub system_prompt: &'static str,
}

pub const CONFIG_DEFAULTS: ConfigDefaults = ConfigDefaults {
    model: "gemini-1.5-pro",
    temperature: 0.7,
    top_p: 1.0,
    top_k: 64,
    max_output_tokens: 2048,
    system_prompt: "",
};

/// Generation parameters as sent to `POST /config`.
///
/// Every field is optional: anything the form could not produce a valid
/// value for is left out of the JSON body entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

/// The six settings inputs, holding exactly what the user typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsForm {
    pub model: String,
    pub temperature: String,
    pub top_p: String,
    pub top_k: String,
    pub max_output_tokens: String,
    pub system_prompt: String,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self {
            model: CONFIG_DEFAULTS.model.to_string(),
            temperature: CONFIG_DEFAULTS.temperature.to_string(),
            top_p: CONFIG_DEFAULTS.top_p.to_string(),
            top_k: CONFIG_DEFAULTS.top_k.to_string(),
            max_output_tokens: CONFIG_DEFAULTS.max_output_tokens.to_string(),
            system_prompt: CONFIG_DEFAULTS.system_prompt.to_string(),
        }
    }
}

impl SettingsForm {
    /// Fill the form from a `GET /config` body.
    ///
    /// Text fields fall back when missing or falsy. Numeric fields
    /// fall back only when missing or null, so a reported `0` is kept.
    pub fn populate(&mut self, remote: &Value) {
        self.model = text_or_default(remote.get("model"), CONFIG_DEFAULTS.model);
        self.temperature = number_or_default(
            remote.get("temperature"),
            CONFIG_DEFAULTS.temperature.to_string(),
        );
        self.top_p = number_or_default(remote.get("top_p"), CONFIG_DEFAULTS.top_p.to_string());
        self.top_k = number_or_default(remote.get("top_k"), CONFIG_DEFAULTS.top_k.to_string());
        self.max_output_tokens = number_or_default(
            remote.get("max_output_tokens"),
            CONFIG_DEFAULTS.max_output_tokens.to_string(),
        );
        self.system_prompt =
            text_or_default(remote.get("system_prompt"), CONFIG_DEFAULTS.system_prompt);
    }

    /// Build the partial config for `POST /config`, dropping empty and
    /// non-numeric fields.
    pub fn to_config(&self) -> GenerationConfig {
        let model = self.model.trim();
        GenerationConfig {
            model: (!model.is_empty()).then(|| model.to_string()),
            temperature: parse_float_prefix(&self.temperature),
            top_p: parse_float_prefix(&self.top_p),
            top_k: parse_int_prefix(&self.top_k),
            max_output_tokens: parse_int_prefix(&self.max_output_tokens),
            system_prompt: (!self.system_prompt.is_empty()).then(|| self.system_prompt.clone()),
        }
    }

    /// Names of the non-empty fields that `to_config` had to drop from
    /// `config`.
    pub fn rejected_fields(&self, config: &GenerationConfig) -> Vec<&'static str> {
        let mut rejected = Vec::new();
        if !self.temperature.trim().is_empty() && config.temperature.is_none() {
            rejected.push("temperature");
        }
        if !self.top_p.trim().is_empty() && config.top_p.is_none() {
            rejected.push("top_p");
        }
        if !self.top_k.trim().is_empty() && config.top_k.is_none() {
            rejected.push("top_k");
        }
        if !self.max_output_tokens.trim().is_empty() && config.max_output_tokens.is_none() {
            rejected.push("max_output_tokens");
        }
        rejected
    }
}

/// `null`, `false`, `0` and `""`: values a form treats as "nothing entered".
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn text_or_default(value: Option<&Value>, default: &str) -> String {
    match value {
        None => default.to_string(),
        Some(v) if is_falsy(v) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => display_number(n),
        Some(other) => other.to_string(),
    }
}

fn number_or_default(value: Option<&Value>, default: String) -> String {
    match value {
        None | Some(Value::Null) => default,
        Some(Value::Number(n)) => display_number(n),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn display_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(f) = n.as_f64() {
        f.to_string()
    } else {
        n.to_string()
    }
}

/// Read the longest leading decimal literal, the way a browser's
/// `parseFloat` does. Non-finite results count as invalid.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits + (frac_end - frac_start) > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read the leading base-10 integer, the way `parseInt(value, 10)` does.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_top_k_is_left_out_of_the_body() {
        let form = SettingsForm {
            top_k: String::new(),
            ..SettingsForm::default()
        };
        let body = serde_json::to_value(form.to_config()).unwrap();
        assert!(body.get("top_k").is_none());
        assert_eq!(body["model"], "gemini-1.5-pro");
        assert_eq!(body["max_output_tokens"], 2048);
    }

    #[test]
    fn non_numeric_fields_are_dropped() {
        let form = SettingsForm {
            temperature: "warm".to_string(),
            top_p: ".".to_string(),
            max_output_tokens: "-".to_string(),
            ..SettingsForm::default()
        };
        let config = form.to_config();
        assert_eq!(config.temperature, None);
        assert_eq!(config.top_p, None);
        assert_eq!(config.max_output_tokens, None);
        assert_eq!(config.top_k, Some(64));
        assert_eq!(
            form.rejected_fields(&config),
            vec!["temperature", "top_p", "max_output_tokens"]
        );
    }

    #[test]
    fn whitespace_model_and_empty_prompt_are_dropped() {
        let form = SettingsForm {
            model: "   ".to_string(),
            system_prompt: String::new(),
            ..SettingsForm::default()
        };
        let body = serde_json::to_value(form.to_config()).unwrap();
        assert!(body.get("model").is_none());
        assert!(body.get("system_prompt").is_none());
    }

    #[test]
    fn model_is_trimmed_but_prompt_is_not() {
        let form = SettingsForm {
            model: "  gemini-1.5-flash ".to_string(),
            system_prompt: " be brief ".to_string(),
            ..SettingsForm::default()
        };
        let config = form.to_config();
        assert_eq!(config.model.as_deref(), Some("gemini-1.5-flash"));
        assert_eq!(config.system_prompt.as_deref(), Some(" be brief "));
    }

    #[test]
    fn float_prefix_parsing() {
        assert_eq!(parse_float_prefix("0.5"), Some(0.5));
        assert_eq!(parse_float_prefix("  .25"), Some(0.25));
        assert_eq!(parse_float_prefix("1."), Some(1.0));
        assert_eq!(parse_float_prefix("0.9abc"), Some(0.9));
        assert_eq!(parse_float_prefix("-2e1x"), Some(-20.0));
        assert_eq!(parse_float_prefix("3e"), Some(3.0));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("1e999"), None);
    }

    #[test]
    fn int_prefix_parsing() {
        assert_eq!(parse_int_prefix("40"), Some(40));
        assert_eq!(parse_int_prefix(" 12.7"), Some(12));
        assert_eq!(parse_int_prefix("+8k"), Some(8));
        assert_eq!(parse_int_prefix("-3"), Some(-3));
        assert_eq!(parse_int_prefix("k8"), None);
        assert_eq!(parse_int_prefix(""), None);
    }

    #[test]
    fn populate_uses_defaults_for_missing_fields() {
        let mut form = SettingsForm {
            model: "stale".to_string(),
            ..SettingsForm::default()
        };
        form.populate(&json!({ "temperature": 0.2, "top_k": null, "model": "" }));
        assert_eq!(form.model, "gemini-1.5-pro");
        assert_eq!(form.temperature, "0.2");
        assert_eq!(form.top_p, "1");
        assert_eq!(form.top_k, "64");
        assert_eq!(form.max_output_tokens, "2048");
        assert_eq!(form.system_prompt, "");
    }

    #[test]
    fn zero_or_false_text_fields_fall_back() {
        let mut form = SettingsForm::default();
        form.populate(&json!({ "model": 0, "system_prompt": false }));
        assert_eq!(form.model, "gemini-1.5-pro");
        assert_eq!(form.system_prompt, "");

        form.populate(&json!({ "model": 15 }));
        assert_eq!(form.model, "15");
    }

    #[test]
    fn falsy_values() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(is_falsy(&value), "{} should be falsy", value);
        }
        for value in [json!(true), json!(1), json!(" "), json!({}), json!([])] {
            assert!(!is_falsy(&value), "{} should not be falsy", value);
        }
    }

    #[test]
    fn populate_keeps_zero_values() {
        let mut form = SettingsForm::default();
        form.populate(&json!({
            "model": "gemini-1.5-flash",
            "temperature": 0,
            "top_p": 0.95,
            "top_k": 0,
            "max_output_tokens": 512,
            "system_prompt": "You are terse."
        }));
        assert_eq!(form.model, "gemini-1.5-flash");
        assert_eq!(form.temperature, "0");
        assert_eq!(form.top_p, "0.95");
        assert_eq!(form.top_k, "0");
        assert_eq!(form.max_output_tokens, "512");
        assert_eq!(form.system_prompt, "You are terse.");
    }
}
