//! Success page shown after a submission.

use tfforge_iac::SynthesisReport;

/// Render the confirmation page for a written document.
pub fn success_page(report: &SynthesisReport) -> String {
    let output = report.output_path.display().to_string();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Configuration generated</title>
</head>
<body>
  <div style="font-family: sans-serif; text-align: center; padding: 40px;">
    <h1 style="color: green;">Configuration generated</h1>
    <p>Written to <code>{output}</code> ({bytes} bytes)</p>
    <ul style="list-style: none;">
      <li><strong>Provider:</strong> {provider} ({topology})</li>
      <li><strong>Server:</strong> {server}</li>
      <li><strong>Security Group:</strong> {sg}</li>
      <li><strong>Subnet CIDR:</strong> {subnet}</li>
    </ul>

    <div style="background: #f8f9fa; padding: 20px; border: 1px solid #ddd; display: inline-block; text-align: left; border-radius: 8px;">
      <code>
        terraform fmt<br>
        git add .<br>
        git commit -m "Update infra with custom SG and Subnet"<br>
        git push
      </code>
    </div>
    <br><br>
    <a href="/">Back to the form</a>
  </div>
</body>
</html>
"#,
        output = escape_html(&output),
        bytes = report.bytes_written,
        provider = report.provider,
        topology = report.topology,
        server = escape_html(&report.resource_name),
        sg = escape_html(&report.security_group_name),
        subnet = escape_html(&report.subnet_cidr),
    )
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use tfforge_iac::{CloudProvider, Topology};

    fn report(name: &str) -> SynthesisReport {
        SynthesisReport {
            resource_name: name.to_string(),
            security_group_name: "sg-web".to_string(),
            subnet_cidr: "172.31.250.0/24".to_string(),
            provider: CloudProvider::Aws,
            topology: Topology::SingleInstance,
            output_path: PathBuf::from("main.tf"),
            bytes_written: 42,
        }
    }

    #[test]
    fn test_success_page_lists_values() {
        let html = success_page(&report("web1"));
        assert!(html.contains("<strong>Server:</strong> web1"));
        assert!(html.contains("<strong>Security Group:</strong> sg-web"));
        assert!(html.contains("<strong>Subnet CIDR:</strong> 172.31.250.0/24"));
        assert!(html.contains("aws (single-instance)"));
        assert!(html.contains("terraform fmt"));
    }

    #[test]
    fn test_success_page_escapes_input() {
        let html = success_page(&report("<script>alert('x')</script>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }
}
