use crate::config::TrackerConfig;
use crate::models::Entry;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub fn render_index(
    config: &TrackerConfig,
    date: NaiveDate,
    entries: &[Entry],
    scores: &BTreeMap<String, i64>,
) -> String {
    INDEX_HTML
        .replace("{{DATE}}", &date.to_string())
        .replace("{{WINDOW_DAYS}}", &config.window_days.to_string())
        .replace("{{CARDS}}", &render_cards(config, date, entries, scores))
        .replace("{{MEMBER_OPTIONS}}", &render_member_options(config))
        .replace("{{STATUS_OPTIONS}}", &render_status_options(config))
}

fn render_cards(
    config: &TrackerConfig,
    date: NaiveDate,
    entries: &[Entry],
    scores: &BTreeMap<String, i64>,
) -> String {
    let mut cards = String::new();
    for member in &config.members {
        let points = scores.get(member).copied().unwrap_or_default();
        let today = entries
            .iter()
            .find(|entry| &entry.member == member && entry.date == date);
        let entry_line = match today {
            Some(entry) => format!("Today: {}", escape(&entry.status)),
            None => "No entry for today yet".to_string(),
        };
        let name = escape(member);
        cards.push_str(&format!(
            r#"<div class="card" data-member="{name}">
  <h3>{name}</h3>
  <span class="points">{points} pts</span>
  <span class="entry">{entry_line}</span>
  <form class="reset-form" method="post" action="/reset">
    <input type="hidden" name="member" value="{name}" />
    <button class="btn-reset" type="submit">Reset today's entry</button>
  </form>
</div>
"#
        ));
    }
    cards
}

fn render_member_options(config: &TrackerConfig) -> String {
    config
        .members
        .iter()
        .map(|member| format!("<option value=\"{0}\">{0}</option>", escape(member)))
        .collect()
}

fn render_status_options(config: &TrackerConfig) -> String {
    config
        .statuses
        .iter()
        .map(|status| format!("<option value=\"{0}\">{0}</option>", escape(&status.label)))
        .collect()
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Fajr Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f5fbff;
      --bg-2: #fff7ec;
      --ink: #102b2a;
      --accent: #0b3d2b;
      --accent-2: #2d7a4b;
      --card: rgba(255, 255, 255, 0.92);
      --shadow: 0 8px 24px rgba(11, 61, 43, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(180deg, var(--bg-1), var(--bg-2));
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(920px, 100%);
      display: grid;
      gap: 24px;
    }

    header h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      color: var(--accent);
      margin: 0;
    }

    .subtitle {
      margin: 4px 0 0;
      color: #556b63;
      font-size: 1rem;
    }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 16px;
    }

    .card {
      background: var(--card);
      border-radius: 14px;
      padding: 18px;
      box-shadow: var(--shadow);
      display: grid;
      gap: 8px;
    }

    .card h3 {
      margin: 0;
      font-size: 1.15rem;
    }

    .card .points {
      font-size: 2.2rem;
      font-weight: 600;
      color: var(--ink);
    }

    .card .entry {
      color: #6b7280;
      font-size: 0.9rem;
      min-height: 1.2em;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      transition: transform 150ms ease;
    }

    button:active {
      transform: scale(0.98);
    }

    .btn-reset {
      background: #eef4f0;
      color: var(--accent);
    }

    .btn-submit {
      background: var(--accent-2);
      color: white;
      box-shadow: 0 8px 18px rgba(45, 122, 75, 0.3);
    }

    .chart-card,
    .entry-card {
      background: var(--card);
      border-radius: 14px;
      padding: 20px;
      box-shadow: var(--shadow);
      display: grid;
      gap: 14px;
    }

    .chart-card h2,
    .entry-card h2 {
      margin: 0;
      font-size: 1.3rem;
      color: var(--accent);
    }

    #chart {
      width: 100%;
      height: 280px;
      display: block;
    }

    #chart text {
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    .chart-line {
      fill: none;
      stroke-width: 3;
    }

    .chart-grid {
      stroke: rgba(11, 61, 43, 0.1);
    }

    .chart-axis {
      stroke: rgba(11, 61, 43, 0.3);
      stroke-dasharray: 4 6;
    }

    .chart-label {
      fill: #6b7280;
      font-size: 11px;
    }

    .legend {
      display: flex;
      flex-wrap: wrap;
      gap: 14px;
      font-size: 0.9rem;
    }

    .legend .swatch {
      display: inline-block;
      width: 12px;
      height: 12px;
      border-radius: 3px;
      margin-right: 6px;
      vertical-align: middle;
    }

    .entry-form {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 12px;
      align-items: end;
    }

    .entry-form label {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
      color: #556b63;
    }

    select {
      border: 1px solid rgba(11, 61, 43, 0.2);
      border-radius: 10px;
      padding: 10px;
      font-size: 0.95rem;
      font-family: inherit;
      background: white;
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="warn"] {
      color: #b8860b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    .hint {
      margin: 0;
      color: #6f6a65;
      font-size: 0.9rem;
    }

    footer {
      text-align: center;
      color: gray;
      font-size: 0.9em;
    }

    @media (max-width: 600px) {
      button {
        width: 100%;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Fajr Tracker</h1>
      <p class="subtitle">Progress and points for the family — {{DATE}}</p>
    </header>

    <section class="cards" id="cards">
{{CARDS}}
    </section>

    <section class="chart-card">
      <h2>Progress (last {{WINDOW_DAYS}} days)</h2>
      <svg id="chart" viewBox="0 0 640 280" aria-label="Cumulative points chart" role="img"></svg>
      <div class="legend" id="legend"></div>
    </section>

    <section class="entry-card">
      <h2>Submit today's entry</h2>
      <form class="entry-form" id="entry-form" method="post" action="/submit">
        <label>Your name
          <select name="member" id="member-select">{{MEMBER_OPTIONS}}</select>
        </label>
        <label>How did you pray Fajr today?
          <select name="status" id="status-select">{{STATUS_OPTIONS}}</select>
        </label>
        <button class="btn-submit" type="submit">Save my entry</button>
      </form>
      <div class="status" id="status"></div>
      <p class="hint">One entry per person per day. Made a mistake? Use the reset button on your card, then submit again.</p>
    </section>

    <footer>Made with care for the family</footer>
  </main>

  <script>
    const cardsEl = document.getElementById('cards');
    const chartEl = document.getElementById('chart');
    const legendEl = document.getElementById('legend');
    const statusEl = document.getElementById('status');
    const entryForm = document.getElementById('entry-form');
    const memberSelect = document.getElementById('member-select');
    const statusSelect = document.getElementById('status-select');

    const palette = ['#2d7a4b', '#ff6b4a', '#2f4858', '#b8860b', '#7c3aed', '#0e7490'];

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const escapeHtml = (raw) =>
      String(raw)
        .replace(/&/g, '&amp;')
        .replace(/</g, '&lt;')
        .replace(/>/g, '&gt;')
        .replace(/"/g, '&quot;');

    const renderCards = (scores, today) => {
      const byMember = new Map(today.entries.map((entry) => [entry.member, entry]));
      cardsEl.innerHTML = scores.scores
        .map((score) => {
          const entry = byMember.get(score.member);
          const line = entry && entry.status
            ? `Today: ${escapeHtml(entry.status)}`
            : 'No entry for today yet';
          const name = escapeHtml(score.member);
          return `<div class="card" data-member="${name}">
  <h3>${name}</h3>
  <span class="points">${score.points} pts</span>
  <span class="entry">${line}</span>
  <form class="reset-form" method="post" action="/reset">
    <input type="hidden" name="member" value="${name}" />
    <button class="btn-reset" type="submit">Reset today's entry</button>
  </form>
</div>`;
        })
        .join('\n');
    };

    const renderChart = (series) => {
      const members = Object.keys(series);
      if (!members.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No records yet</text>';
        legendEl.innerHTML = '';
        return;
      }

      const width = 640;
      const height = 280;
      const paddingX = 44;
      const paddingY = 34;
      const top = 24;

      const dayCount = series[members[0]].length;
      let min = 0;
      let max = 0;
      members.forEach((member) => {
        series[member].forEach((point) => {
          min = Math.min(min, point.total);
          max = Math.max(max, point.total);
        });
      });
      if (min === max) {
        min -= 1;
        max += 1;
      }

      const range = max - min;
      const xStep = dayCount > 1 ? (width - paddingX * 2) / (dayCount - 1) : 0;
      const scaleY = (height - top - paddingY) / range;
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - (value - min) * scaleY;

      const ticks = 4;
      let grid = '';
      for (let i = 0; i <= ticks; i += 1) {
        const value = min + (range * i) / ticks;
        const yPos = y(value);
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${yPos + 4}" text-anchor="end">${Math.round(value * 10) / 10}</text>`;
      }

      const labelEvery = Math.max(1, Math.ceil(dayCount / 10));
      const labels = series[members[0]]
        .map((point, index) => {
          if (index % labelEvery !== 0) {
            return '';
          }
          return `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${point.date.slice(5)}</text>`;
        })
        .join('');

      const zeroLine = `<line class="chart-axis" x1="${paddingX}" y1="${y(0)}" x2="${width - paddingX}" y2="${y(0)}" />`;

      const paths = members
        .map((member, memberIndex) => {
          const color = palette[memberIndex % palette.length];
          const path = series[member]
            .map((point, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${y(point.total).toFixed(2)}`)
            .join(' ');
          return `<path class="chart-line" stroke="${color}" d="${path}" />`;
        })
        .join('');

      chartEl.setAttribute('viewBox', `0 0 ${width} ${height}`);
      chartEl.innerHTML = `${grid}${zeroLine}${paths}${labels}`;

      legendEl.innerHTML = members
        .map((member, index) => {
          const color = palette[index % palette.length];
          return `<span><span class="swatch" style="background:${color}"></span>${escapeHtml(member)}</span>`;
        })
        .join('');
    };

    const refresh = async () => {
      const [scoresRes, todayRes, seriesRes] = await Promise.all([
        fetch('/api/scores'),
        fetch('/api/today'),
        fetch('/api/series')
      ]);
      if (!scoresRes.ok || !todayRes.ok || !seriesRes.ok) {
        throw new Error('Unable to load tracker data');
      }
      const scores = await scoresRes.json();
      const today = await todayRes.json();
      const seriesBody = await seriesRes.json();
      renderCards(scores, today);
      renderChart(seriesBody.series);
      wireResetForms();
    };

    const submitEntry = async () => {
      setStatus('Saving...', '');
      const res = await fetch('/api/submit', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({
          member: memberSelect.value,
          status: statusSelect.value
        })
      });

      if (res.status === 409) {
        setStatus('You already recorded your Fajr for today. Use the reset button on your card if you need to change it.', 'warn');
        return;
      }
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }

      setStatus('Saved! Progress updates for everyone within a few seconds.', 'ok');
      await refresh();
    };

    const resetEntry = async (member) => {
      const res = await fetch('/api/reset', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ member })
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Reset failed');
      }
      setStatus(`Cleared today's entry for ${member}.`, 'ok');
      await refresh();
    };

    const wireResetForms = () => {
      document.querySelectorAll('.reset-form').forEach((form) => {
        form.addEventListener('submit', (event) => {
          event.preventDefault();
          const member = form.querySelector('input[name="member"]').value;
          resetEntry(member).catch((err) => setStatus(err.message, 'error'));
        });
      });
    };

    entryForm.addEventListener('submit', (event) => {
      event.preventDefault();
      submitEntry().catch((err) => setStatus(err.message, 'error'));
    });

    wireResetForms();
    refresh().catch((err) => setStatus(err.message, 'error'));
    setInterval(() => {
      refresh().catch(() => {});
    }, 5000);
  </script>
</body>
</html>
"#;
