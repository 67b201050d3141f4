//! HTML pages rendered from plain strings.

use crate::model::PredictionRecord;
use crate::schema::{FieldErrors, PredictionForm};
use crate::session::Session;

const FORM_FIELDS: [(&str, &str); 5] = [
    ("luas_panen", "Luas Panen (ha)"),
    ("bibit", "Bibit (kg)"),
    ("pupuk_npk", "Pupuk NPK (kg)"),
    ("pupuk_urea", "Pupuk Urea (kg)"),
    ("obat_insectisida", "Obat Insektisida (liter)"),
];

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, user: Option<&Session>, body: &str) -> String {
    let account = match user {
        Some(session) => format!(
            r#"<span class="user">{}</span> <a href="/logout">Logout</a>"#,
            escape_html(&session.username)
        ),
        None => r#"<a href="/login">Login</a> <a href="/register">Register</a>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav><a href="/">Prediksi</a> <a href="/history">Riwayat</a> {account}</nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

pub fn index_page(
    form: &PredictionForm,
    errors: &FieldErrors,
    prediction: Option<f64>,
    user: Option<&Session>,
) -> String {
    let mut body = String::from(r#"<form method="post" action="/">"#);
    for (name, label) in FORM_FIELDS {
        body.push_str(&format!(
            r#"
<div class="field">
<label for="{name}">{label}</label>
<input type="text" id="{name}" name="{name}" value="{value}">"#,
            value = escape_html(form.value(name)),
        ));
        if let Some(msg) = errors.get(name) {
            body.push_str(&format!(
                r#"
<p class="error" data-field="{name}">{msg}</p>"#
            ));
        }
        body.push_str("\n</div>");
    }
    body.push_str("\n<button type=\"submit\">Prediksi</button>\n</form>");

    if let Some(value) = prediction {
        body.push_str(&format!(
            r#"
<p class="result">Hasil prediksi panen: <strong id="prediction">{value:.2}</strong></p>"#
        ));
    }

    layout("Prediksi Hasil Panen", user, &body)
}

pub fn history_page(records: &[PredictionRecord], user: Option<&Session>) -> String {
    let mut body = String::from(
        "<table>\n<thead><tr><th>No</th><th>Luas Panen</th><th>Bibit</th><th>Pupuk NPK</th>\
         <th>Pupuk Urea</th><th>Obat Insektisida</th><th>Hasil Panen</th><th>Waktu</th></tr></thead>\n<tbody>",
    );

    for (row, record) in records.iter().enumerate() {
        body.push_str(&format!(
            "\n<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td></tr>",
            row + 1,
            record.luas_panen,
            record.bibit,
            record.pupuk_npk,
            record.pupuk_urea,
            record.obat_insectisida,
            record.hasil_panen,
            record.created_at.format("%Y-%m-%d %H:%M:%S"),
        ));
    }
    body.push_str("\n</tbody>\n</table>");

    if records.is_empty() {
        body.push_str("\n<p>Belum ada prediksi.</p>");
    }

    layout("Riwayat Prediksi", user, &body)
}

fn credentials_form(action: &str, button: &str) -> String {
    format!(
        r#"<form method="post" action="{action}">
<label for="username">Username</label>
<input type="text" id="username" name="username">
<label for="password">Password</label>
<input type="password" id="password" name="password">
<button type="submit">{button}</button>
</form>"#
    )
}

fn message(class: &str, text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("<p class=\"{class}\">{}</p>\n", escape_html(text))
    }
}

pub fn login_page(msg: &str) -> String {
    let body = format!("{}{}", message("error", msg), credentials_form("/login", "Login"));
    layout("Login", None, &body)
}

pub fn register_page(msg: &str, msg_success: &str) -> String {
    let body = format!(
        "{}{}{}",
        message("error", msg),
        message("success", msg_success),
        credentials_form("/register", "Register"),
    );
    layout("Register", None, &body)
}

pub fn error_page(msg: &str) -> String {
    layout("Kesalahan", None, &message("error", msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::NOT_A_NUMBER;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_index_echoes_escaped_values_and_errors() {
        let form = PredictionForm {
            luas_panen: Some("<b>".to_string()),
            ..Default::default()
        };
        let mut errors = FieldErrors::new();
        errors.insert("luas_panen", NOT_A_NUMBER);

        let html = index_page(&form, &errors, None, None);
        assert!(html.contains(r#"value="&lt;b&gt;""#));
        assert!(html.contains(r#"data-field="luas_panen""#));
        assert!(!html.contains(r#"data-field="bibit""#));
        assert!(!html.contains("id=\"prediction\""));
    }

    #[test]
    fn test_index_shows_prediction_and_user() {
        let user = Session {
            logged_in: true,
            user_id: 1,
            username: "budi".to_string(),
        };
        let html = index_page(&PredictionForm::default(), &FieldErrors::new(), Some(12.3456), Some(&user));
        assert!(html.contains(r#"<strong id="prediction">12.35</strong>"#));
        assert!(html.contains("budi"));
        assert!(html.contains("/logout"));
    }

    #[test]
    fn test_history_rows_are_numbered() {
        let record = PredictionRecord {
            id: 9,
            luas_panen: 2.5,
            bibit: 40.0,
            pupuk_npk: 300.0,
            pupuk_urea: 200.0,
            obat_insectisida: 1.0,
            hasil_panen: 14.256,
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap(),
        };

        let html = history_page(&[record.clone(), record], None);
        assert!(html.contains("<tr><td>1</td><td>2.5</td><td>40</td>"));
        assert!(html.contains("<tr><td>2</td>"));
        assert!(html.contains("<td>14.26</td><td>2024-01-02 03:04:05</td>"));
        assert!(!html.contains("Belum ada prediksi."));

        assert!(history_page(&[], None).contains("Belum ada prediksi."));
    }

    #[test]
    fn test_messages_skip_empty() {
        assert!(!login_page("").contains("class=\"error\""));
        assert!(register_page("", "ok").contains("<p class=\"success\">ok</p>"));
    }
}
