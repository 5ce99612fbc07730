//! Admin dashboard payloads.
//!
//! Stats and logs are fixed sample data; nothing here touches the knowledge
//! store. The dashboard page renders both endpoints client-side.

use serde::Serialize;

/// Labelled series rendered as one chart on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series {
    pub labels: Vec<&'static str>,
    pub data: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_chats: u32,
    pub total_messages: u32,
    pub positive_feedback: u32,
    pub negative_feedback: u32,
    pub daily_activity: Series,
    pub top_categories: Series,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub timestamp: &'static str,
    pub user_query: &'static str,
    pub response: &'static str,
    pub category: &'static str,
    /// `"positive"`, `"negative"`, or `null`.
    pub feedback: Option<&'static str>,
}

pub fn stats() -> DashboardStats {
    DashboardStats {
        total_chats: 124,
        total_messages: 342,
        positive_feedback: 89,
        negative_feedback: 12,
        daily_activity: Series {
            labels: vec!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
            data: vec![12, 19, 15, 17, 22, 30, 25],
        },
        top_categories: Series {
            labels: vec!["Services", "Capabilities", "Process", "About", "Contact"],
            data: vec![45, 38, 27, 18, 15],
        },
    }
}

const SAMPLE_LOGS: [LogRecord; 5] = [
    LogRecord {
        timestamp: "2023-06-15T10:30:00Z",
        user_query: "What services do you offer?",
        response: "We offer a comprehensive range of IT services including software development, cloud solutions, and cybersecurity services.",
        category: "Services",
        feedback: Some("positive"),
    },
    LogRecord {
        timestamp: "2023-06-15T09:15:00Z",
        user_query: "Tell me about Oracle HCM",
        response: "Oracle HCM Cloud is a complete suite of applications for managing human resources.",
        category: "Capabilities",
        feedback: Some("positive"),
    },
    LogRecord {
        timestamp: "2023-06-14T16:45:00Z",
        user_query: "How does your development process work?",
        response: "Our process includes requirements gathering, design, development, testing, and deployment phases.",
        category: "Process",
        feedback: Some("negative"),
    },
    LogRecord {
        timestamp: "2023-06-14T14:20:00Z",
        user_query: "Contact information?",
        response: "You can reach us at contact@yvi.com or call us at +1-234-567-8900.",
        category: "Contact",
        feedback: None,
    },
    LogRecord {
        timestamp: "2023-06-13T11:10:00Z",
        user_query: "About your company",
        response: "YVI Soft Solutions is a leading IT consulting firm specializing in enterprise solutions.",
        category: "About",
        feedback: Some("positive"),
    },
];

pub fn logs() -> &'static [LogRecord] {
    &SAMPLE_LOGS
}

pub const DASHBOARD_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>YVI Assistant · Admin</title>
  <style>
    body { font-family: system-ui, -apple-system, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; }
    header { background: #1e3a8a; color: #fff; padding: 1rem 2rem; }
    main { padding: 1.5rem 2rem; }
    .cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 1rem; }
    .card { background: #fff; border: 1px solid #e2e8f0; border-radius: 8px; padding: 1rem; }
    .card h2 { font-size: 0.8rem; color: #64748b; margin: 0 0 0.5rem; text-transform: uppercase; }
    .card p { font-size: 1.6rem; margin: 0; }
    .bars { display: flex; align-items: flex-end; gap: 0.5rem; height: 120px; }
    .bar { flex: 1; background: #3b82f6; border-radius: 4px 4px 0 0; position: relative; }
    .bar span { position: absolute; bottom: -1.3rem; left: 0; right: 0; text-align: center; font-size: 0.7rem; }
    table { width: 100%; border-collapse: collapse; margin-top: 1rem; background: #fff; }
    th, td { text-align: left; padding: 0.5rem; border-bottom: 1px solid #e2e8f0; font-size: 0.85rem; }
    .positive { color: #16a34a; } .negative { color: #dc2626; }
  </style>
</head>
<body>
  <header><h1>YVI Assistant Admin</h1></header>
  <main>
    <section class="cards" id="cards"></section>
    <section class="cards" style="margin-top:1rem">
      <div class="card"><h2>Daily activity</h2><div class="bars" id="daily"></div></div>
      <div class="card"><h2>Top categories</h2><div class="bars" id="categories"></div></div>
    </section>
    <h2 style="margin-top:2rem">Recent conversations</h2>
    <table>
      <thead><tr><th>Time</th><th>Query</th><th>Response</th><th>Category</th><th>Feedback</th></tr></thead>
      <tbody id="logs"></tbody>
    </table>
  </main>
  <script>
    function el(tag, text, cls) {
      const node = document.createElement(tag);
      if (text !== undefined) node.textContent = text;
      if (cls) node.className = cls;
      return node;
    }
    function bars(target, series) {
      const max = Math.max(...series.data, 1);
      series.labels.forEach((label, i) => {
        const bar = el("div", undefined, "bar");
        bar.style.height = (series.data[i] / max * 100) + "%";
        bar.title = label + ": " + series.data[i];
        bar.appendChild(el("span", label));
        target.appendChild(bar);
      });
    }
    fetch("/api/stats").then(r => r.json()).then(s => {
      const cards = document.getElementById("cards");
      [["Total chats", s.totalChats], ["Total messages", s.totalMessages],
       ["Positive feedback", s.positiveFeedback], ["Negative feedback", s.negativeFeedback]]
        .forEach(([title, value]) => {
          const card = el("div", undefined, "card");
          card.appendChild(el("h2", title));
          card.appendChild(el("p", String(value)));
          cards.appendChild(card);
        });
      bars(document.getElementById("daily"), s.dailyActivity);
      bars(document.getElementById("categories"), s.topCategories);
    });
    fetch("/api/logs").then(r => r.json()).then(rows => {
      const body = document.getElementById("logs");
      rows.forEach(row => {
        const tr = el("tr");
        tr.appendChild(el("td", new Date(row.timestamp).toLocaleString()));
        tr.appendChild(el("td", row.user_query));
        tr.appendChild(el("td", row.response));
        tr.appendChild(el("td", row.category));
        tr.appendChild(el("td", row.feedback || "n/a", row.feedback || ""));
        body.appendChild(tr);
      });
    });
  </script>
</body>
</html>
"#;
