use subsentry_engine::{Subscription, format_amount, format_calendar_date};
use url::Url;

const BRAND_NAME: &str = "SubSentry";

fn origin_label(app_origin: &str) -> String {
    Url::parse(app_origin)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.to_string()))
        .unwrap_or_else(|| app_origin.to_string())
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn primary_button(url: &str, label: &str) -> String {
    format!(
        r#"<a href="{url}" style="display:inline-block;padding:12px 18px;background-color:#4A90E2;color:#ffffff;text-decoration:none;border-radius:8px;font-weight:600;">{label}</a>"#
    )
}

/// Renewal reminder. Returns `(subject, html)`.
pub fn reminder_email(
    app_origin: &str,
    user_name: Option<&str>,
    subscription: &Subscription,
    custom_message: Option<&str>,
) -> (String, String) {
    let subject = format!("Reminder: {} subscription renewing soon", subscription.name);
    let name = escape_html(&subscription.name);
    let headline = match user_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(user) => format!("Hi {},", escape_html(user)),
        None => "Hi there,".to_string(),
    };
    let lead = format!(
        "Just a friendly reminder that your <strong>{name}</strong> subscription is coming up for renewal."
    );

    let note = custom_message
        .map(|msg| {
            format!(
                r#"<p style="background:#F8F9FA;padding:15px;border-left:3px solid #4A90E2;margin:20px 0;">{}</p>"#,
                escape_html(msg)
            )
        })
        .unwrap_or_default();
    let button = primary_button(app_origin, "Manage your subscriptions");
    let body = format!(
        r#"<div style="background:#E8F4FD;padding:20px;border-radius:12px;margin:20px 0;">
        <p style="margin:0;"><strong>Amount:</strong> {amount}</p>
        <p style="margin:10px 0 0 0;"><strong>Renewal date:</strong> {date}</p>
      </div>
      {note}
      <p style="margin:12px 0;color:#374151;">This is just a heads-up so you can stay in control of your spending.</p>
      {button}"#,
        amount = format_amount(subscription.currency, subscription.amount),
        date = format_calendar_date(subscription.next_billing_date),
    );
    let reason = format!("you scheduled a reminder for {name}");

    let html = wrap_email(app_origin, &headline, &lead, &body, &reason);
    (subject, html)
}

pub fn wrap_email(
    app_origin: &str,
    headline: &str,
    lead: &str,
    body_html: &str,
    reason: &str,
) -> String {
    let origin = origin_label(app_origin);
    let reason_label = "Why you got this email";

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <body style="background:#f8fafc;margin:0;padding:24px;font-family:Inter,Arial,Helvetica,sans-serif;">
    <div style="max-width:560px;margin:0 auto;background:#ffffff;border:1px solid #e5e7eb;border-radius:12px;padding:24px;">
      <div style="font-size:12px;letter-spacing:0.08em;text-transform:uppercase;color:#6b7280;">{brand} - {origin}</div>
      <h1 style="margin:12px 0 8px;font-size:22px;color:#1A1A1A;">{headline}</h1>
      <p style="margin:0 0 12px;font-size:15px;color:#1A1A1A;line-height:1.6;">{lead}</p>
      {body_html}
      <div style="margin-top:20px;padding-top:16px;border-top:1px solid #e5e7eb;">
        <p style="margin:0;font-size:13px;color:#4b5563;">{reason_label}: {reason}.</p>
      </div>
      <p style="margin:14px 0 0;font-size:12px;color:#9ca3af;">Sent with care from {brand}</p>
    </div>
  </body>
</html>
"#,
        brand = BRAND_NAME,
    )
}
