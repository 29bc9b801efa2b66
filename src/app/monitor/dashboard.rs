//! 请求监控页面渲染

use serde_json::Value;

use super::recorder::RecordedRequest;

pub const REFRESH_SECONDS: u32 = 30;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>API Request Monitor</title>
    <style>
        body { font-family: Arial, sans-serif; max-width: 1200px; margin: 0 auto; padding: 20px; background-color: #f5f5f5; }
        h1 { color: #333; text-align: center; }
        .request-container { background-color: white; border-radius: 8px; padding: 20px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        .request-item { border-left: 4px solid #007bff; margin-bottom: 15px; padding: 10px; background-color: #f8f9fa; }
        .method { font-weight: bold; color: #007bff; }
        .timestamp { color: #666; font-size: 0.9em; }
        .path { color: #28a745; }
        .auto-refresh { text-align: center; margin-bottom: 20px; }
        pre { background-color: #f8f9fa; padding: 10px; border-radius: 4px; overflow-x: auto; }
    </style>
</head>
<body>
    <h1>API Request Monitor</h1>
"#;

const PAGE_SCRIPT: &str = r#"    <script>
        const REFRESH_SECONDS = __REFRESH__;
        let timer = REFRESH_SECONDS;
        let intervalId;
        let isRefreshing = true;

        function updateTimer() {
            document.getElementById('timer').textContent = timer;
            if (timer === 0) {
                location.reload();
                timer = REFRESH_SECONDS;
            } else {
                timer--;
            }
        }

        function toggleRefresh() {
            const button = document.getElementById('refreshToggle');
            if (isRefreshing) {
                clearInterval(intervalId);
                button.textContent = 'Resume';
            } else {
                startTimer();
                button.textContent = 'Pause';
            }
            isRefreshing = !isRefreshing;
        }

        function startTimer() {
            timer = REFRESH_SECONDS;
            intervalId = setInterval(updateTimer, 1000);
        }

        document.getElementById('refreshToggle').addEventListener('click', toggleRefresh);
        startTimer();
    </script>
</body>
</html>
"#;

/// 渲染监控页面，只读取传入的记录
pub fn render_dashboard(requests: &[RecordedRequest]) -> String {
    let mut html = String::with_capacity(PAGE_HEAD.len() + PAGE_SCRIPT.len() + requests.len() * 512);
    html.push_str(PAGE_HEAD);

    html.push_str(&format!(
        "    <div class=\"auto-refresh\">\n        Auto-refresh in <span id=\"timer\">{REFRESH_SECONDS}</span> seconds\n        <button id=\"refreshToggle\">Pause</button>\n    </div>\n"
    ));

    html.push_str("    <div class=\"request-container\" id=\"requestList\">\n");
    for request in requests {
        render_item(&mut html, request);
    }
    html.push_str("    </div>\n");

    html.push_str(&PAGE_SCRIPT.replace("__REFRESH__", &REFRESH_SECONDS.to_string()));
    html
}

fn render_item(html: &mut String, request: &RecordedRequest) {
    html.push_str(&format!(
        "        <div class=\"request-item\">\n            <div>\n                <span class=\"method\">{}</span>\n                <span class=\"path\">{}</span>\n            </div>\n            <div class=\"timestamp\">{}</div>\n",
        escape_html(&request.method),
        escape_html(&request.path),
        escape_html(&request.timestamp),
    ));

    if !request.query.is_empty() {
        render_json_block(html, "Query", &Value::Object(request.query.clone()));
    }
    if let Some(body) = &request.body {
        render_json_block(html, "Body", body);
    }

    html.push_str("        </div>\n");
}

fn render_json_block(html: &mut String, label: &str, value: &Value) {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_default();
    html.push_str(&format!(
        "            <div>{label}: <pre>{}</pre></div>\n",
        escape_html(&pretty)
    ));
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn request(method: &str, path: &str, body: Option<Value>) -> RecordedRequest {
        RecordedRequest {
            timestamp: "2024-05-01T12:00:00.000Z".to_string(),
            method: method.to_string(),
            path: path.to_string(),
            query: Map::new(),
            body,
            source_address: "127.0.0.1".to_string(),
        }
    }

    #[test]
    fn test_empty_dashboard() {
        let html = render_dashboard(&[]);
        assert!(html.contains("<title>API Request Monitor</title>"));
        assert!(html.contains("<span id=\"timer\">30</span>"));
        assert!(html.contains("const REFRESH_SECONDS = 30;"));
        assert!(!html.contains("request-item\">"));
    }

    #[test]
    fn test_renders_entries_in_given_order() {
        let html = render_dashboard(&[
            request("POST", "/users", Some(json!({"name": "Al"}))),
            request("GET", "/health", None),
        ]);

        let post = html.find("/users").unwrap();
        let get = html.find("/health").unwrap();
        assert!(post < get);
        assert!(html.contains("Body: <pre>{\n  &quot;name&quot;: &quot;Al&quot;\n}</pre>"));
        assert_eq!(html.matches("Body:").count(), 1);
    }

    #[test]
    fn test_query_only_when_present() {
        let mut with_query = request("GET", "/users", None);
        with_query.query.insert("page".into(), json!("2"));

        let html = render_dashboard(&[with_query, request("GET", "/", None)]);
        assert_eq!(html.matches("Query:").count(), 1);
        assert!(html.contains("&quot;page&quot;: &quot;2&quot;"));
    }

    #[test]
    fn test_escapes_markup() {
        let html = render_dashboard(&[request("GET", "/<script>alert(1)</script>", None)]);
        assert!(html.contains("/&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("/<script>alert"));
    }
}
