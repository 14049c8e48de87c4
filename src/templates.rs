//! Sample HTML documents for testing and demonstration.
//!
//! Each one leans on inline styles the way exported or hand-written email
//! markup does, so deduplication has something to find.

/// Newsletter with repeated paragraph and heading styles.
pub fn newsletter_template() -> &'static str {
    r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Monthly Update</title>
</head>
<body style="margin: 0; padding: 0; background-color: #f4f4f4">
    <!-- header -->
    <div style="max-width: 600px; margin: 0 auto; background-color: #ffffff">
        <h1 style="font-family: Arial, sans-serif; color: #1a365d; font-size: 24px; margin: 0 0 12px 0">Monthly Update</h1>
        <p style="font-family: Arial, sans-serif; color: #333333; font-size: 14px; line-height: 1.5">
            Welcome to this month's edition.
        </p>
        <p style="font-family: Arial, sans-serif; color: #333333; font-size: 14px; line-height: 1.5">
            We shipped <span style="font-weight: bold; color: #2f855a">three</span> new features.
        </p>
        <h2 style="font-family: Arial, sans-serif; color: #1a365d; font-size: 18px">Highlights</h2>
        <ul style="padding-left: 20px">
            <li style="font-family: Arial, sans-serif; color: #333333; font-size: 14px">Faster exports</li>
            <li style="font-family: Arial, sans-serif; color: #333333; font-size: 14px">Dark mode</li>
            <li style="font-family: Arial, sans-serif; color: #333333; font-size: 14px">Team sharing</li>
        </ul>
        <p style="font-family: Arial, sans-serif; color: #999999; font-size: 12px; text-align: center">
            You are receiving this because you subscribed.
        </p>
    </div>
</body>
</html>
"##
}

/// Invoice table where every cell carries the same padding and border.
pub fn invoice_template() -> &'static str {
    r##"<!DOCTYPE html>
<html>
<head><title>Invoice #2024-001</title></head>
<body>
    <h1 style="font-size: 28px; font-weight: bold; color: #1a365d">Invoice #2024-001</h1>
    <table style="width: 100%; border-collapse: collapse">
        <tr>
            <th style="padding: 8px; border: 1px solid #ddd; text-align: left; background: #eee">Item</th>
            <th style="padding: 8px; border: 1px solid #ddd; text-align: left; background: #eee">Qty</th>
            <th style="padding: 8px; border: 1px solid #ddd; text-align: right; background: #eee">Total</th>
        </tr>
        <tr>
            <td style="padding: 8px; border: 1px solid #ddd">Web Development</td>
            <td style="padding: 8px; border: 1px solid #ddd">40</td>
            <td style="padding: 8px; border: 1px solid #ddd; text-align: right">$6,000.00</td>
        </tr>
        <tr>
            <td style="padding: 8px; border: 1px solid #ddd">Hosting (Annual)</td>
            <td style="padding: 8px; border: 1px solid #ddd">1</td>
            <td style="padding: 8px; border: 1px solid #ddd; text-align: right">$500.00</td>
        </tr>
    </table>
    <p style="text-align: right; font-size: 18px; font-weight: bold">Total: $6,500.00</p>
</body>
</html>
"##
}

/// Empty, malformed and duplicate-property styles.
pub fn malformed_template() -> &'static str {
    r##"<div style="">
    <p style=";;  ;">empty declarations</p>
    <p style="color:">missing value</p>
    <p style="just-garbage">no colon</p>
    <p style="COLOR: Red; color: blue">duplicate property</p>
    <p style="color: blue">plain blue</p>
    <pre style="margin:0">  keep
    this   </pre>
</div>
"##
}

/// No inline styles at all.
pub fn minimal_template() -> &'static str {
    "<h1>Hello</h1><p>World</p>"
}

/// Look up a template by name.
pub fn by_name(name: &str) -> Option<&'static str> {
    match name {
        "newsletter" => Some(newsletter_template()),
        "invoice" => Some(invoice_template()),
        "malformed" => Some(malformed_template()),
        "minimal" => Some(minimal_template()),
        _ => None,
    }
}

/// Names accepted by [`by_name`].
pub const TEMPLATE_NAMES: [&str; 4] = ["newsletter", "invoice", "malformed", "minimal"];
