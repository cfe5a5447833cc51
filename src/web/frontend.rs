//! Embedded HTML/CSS/JS frontend for the waypoint dashboard.
//!
//! The entire page is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies.
//!
//! The stats script owns exactly three nodes — `#journey-progress`,
//! `#completed-tasks`, and `#hero-text` — and leaves the video, reminders,
//! and partner-call panels alone. On a failed or malformed fetch it keeps
//! whatever the regions already show.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>waypoint Dashboard</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --purple: #bc8cff;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app {
  max-width: 1080px;
  margin: 0 auto;
  padding: 24px;
}

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}

header h1 {
  font-size: 24px;
  font-weight: 600;
  display: flex;
  align-items: center;
  gap: 10px;
}

header h1 .logo {
  color: var(--accent);
  font-family: var(--mono);
  font-weight: 700;
}

header .subtitle {
  color: var(--text-muted);
  font-size: 13px;
}

.who {
  display: flex;
  align-items: center;
  gap: 8px;
}

.who input {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: 6px;
  color: var(--text);
  padding: 6px 10px;
  font-family: var(--mono);
  font-size: 13px;
  width: 180px;
}

.who input:focus { outline: none; border-color: var(--accent); }

/* Hero */
.hero {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 28px 24px;
  margin-bottom: 16px;
  text-align: center;
}

.hero #hero-text {
  font-size: 22px;
  font-weight: 600;
}

/* Stat cards */
.cards {
  display: grid;
  grid-template-columns: 1fr 1fr;
  gap: 16px;
  margin-bottom: 16px;
}

.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
}

.card .label {
  color: var(--text-muted);
  font-size: 12px;
  text-transform: uppercase;
  letter-spacing: 0.05em;
  margin-bottom: 8px;
}

.card .value {
  font-size: 32px;
  font-weight: 700;
  font-family: var(--mono);
}

.card .value.progress { color: var(--accent); }
.card .value.tasks { color: var(--green); }

.stages {
  display: flex;
  gap: 6px;
  margin-top: 12px;
}

.stage-dot {
  flex: 1;
  height: 6px;
  border-radius: 3px;
  background: var(--border);
}

.stage-dot.done { background: var(--accent); }

/* Independent module panels */
.panels {
  display: grid;
  grid-template-columns: 1fr 1fr 1fr;
  gap: 16px;
}

.panel {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
}

.panel h2 {
  font-size: 13px;
  font-weight: 600;
  margin-bottom: 8px;
  color: var(--purple);
}

.panel .placeholder {
  color: var(--text-muted);
  font-size: 13px;
}

footer {
  margin-top: 24px;
  color: var(--text-muted);
  font-size: 12px;
  text-align: center;
}
</style>
</head>
<body>
<div class="app">
  <header>
    <h1><span class="logo">»</span> waypoint <span class="subtitle">ambassador dashboard</span></h1>
    <div class="who">
      <label for="ambassador" class="subtitle">Ambassador</label>
      <input id="ambassador" type="text" value="" placeholder="your-id" spellcheck="false">
    </div>
  </header>

  <!-- Stats sync writes these three regions and nothing else. -->
  <section class="hero">
    <div id="hero-text">&nbsp;</div>
  </section>

  <section class="cards">
    <div class="card">
      <div class="label">Journey progress</div>
      <div class="value progress" id="journey-progress">–</div>
      <div class="stages" id="journey-stages">
        <div class="stage-dot"></div>
        <div class="stage-dot"></div>
        <div class="stage-dot"></div>
        <div class="stage-dot"></div>
        <div class="stage-dot"></div>
        <div class="stage-dot"></div>
      </div>
    </div>
    <div class="card">
      <div class="label">Completed tasks</div>
      <div class="value tasks" id="completed-tasks">–</div>
    </div>
  </section>

  <!-- Panels below belong to their own modules. -->
  <section class="panels">
    <div class="panel" id="video-panel">
      <h2>Training videos</h2>
      <div class="placeholder">Managed by the video module.</div>
    </div>
    <div class="panel" id="reminders-panel">
      <h2>Reminders</h2>
      <div class="placeholder">Managed by the reminders module.</div>
    </div>
    <div class="panel" id="partner-calls-panel">
      <h2>Partner calls</h2>
      <div class="placeholder">Managed by the partner-call module.</div>
    </div>
  </section>

  <footer>Stats refresh automatically. Last sync: <span id="last-sync">never</span></footer>
</div>

<script>
const REFRESH_MS = 30000;

function currentAmbassador() {
  return document.getElementById('ambassador').value.trim();
}

async function syncStats() {
  const id = currentAmbassador();
  if (!id) return;

  try {
    const resp = await fetch(`/api/ambassadors/${encodeURIComponent(id)}/stats`);
    if (!resp.ok) return; // retain current values
    const stats = await resp.json();

    if (typeof stats.journey_progress !== 'number' ||
        typeof stats.completed_tasks_count !== 'number' ||
        typeof stats.hero_text !== 'string') {
      return; // retain current values
    }

    document.getElementById('journey-progress').textContent = stats.journey_progress;
    document.getElementById('completed-tasks').textContent = stats.completed_tasks_count;
    document.getElementById('hero-text').textContent = stats.hero_text;

    const dots = document.querySelectorAll('#journey-stages .stage-dot');
    dots.forEach((dot, i) => dot.classList.toggle('done', i < stats.journey_progress));

    document.getElementById('last-sync').textContent = new Date().toLocaleTimeString();
  } catch (_) {
    // Network failure: keep last-known-good values.
  }
}

document.getElementById('ambassador').addEventListener('change', syncStats);
syncStats();
setInterval(syncStats, REFRESH_MS);
</script>
</body>
</html>
"##;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
