use crate::models::Dataset;

pub fn render_index(dataset: &Dataset) -> String {
    let first = dataset.data.first().map(|day| day.date.as_str()).unwrap_or("");
    let last = dataset.data.last().map(|day| day.date.as_str()).unwrap_or("");
    INDEX_HTML
        .replace("{{VARIATIONS}}", &dataset.variations.len().to_string())
        .replace("{{DAYS}}", &dataset.data.len().to_string())
        .replace("{{FIRST_DATE}}", &escape_html(first))
        .replace("{{LAST_DATE}}", &escape_html(last))
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en" data-theme="light">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Conversion Rate Dashboard</title>
  <style>
    :root {
      --bg: #f6f7fb;
      --card: #ffffff;
      --ink: #23262f;
      --muted: #6c7080;
      --border: rgba(35, 38, 47, 0.1);
      --chart-grid: #d9dce5;
      --chart-axis: #6c7080;
      --accent: #4a90e2;
      --shadow: 0 18px 40px rgba(35, 38, 47, 0.08);
    }

    [data-theme="dark"] {
      --bg: #15171d;
      --card: #1f222b;
      --ink: #eef0f6;
      --muted: #9aa0b4;
      --border: rgba(238, 240, 246, 0.12);
      --chart-grid: #343846;
      --chart-axis: #9aa0b4;
      --shadow: 0 18px 40px rgba(0, 0, 0, 0.4);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 28px 18px 40px;
      transition: background 200ms ease, color 200ms ease;
    }

    .app {
      width: min(1100px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 20px;
    }

    header h1 {
      margin: 0;
      font-size: clamp(1.6rem, 3vw, 2.2rem);
    }

    .subtitle {
      margin: 4px 0 0;
      color: var(--muted);
    }

    .controls {
      display: flex;
      flex-wrap: wrap;
      justify-content: space-between;
      gap: 16px;
      background: var(--card);
      border: 1px solid var(--border);
      border-radius: 16px;
      padding: 14px 18px;
      box-shadow: var(--shadow);
    }

    .variations,
    .right-controls {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      gap: 12px;
    }

    .variation-label {
      display: inline-flex;
      align-items: center;
      gap: 8px;
      cursor: pointer;
      font-size: 0.95rem;
    }

    .swatch {
      width: 12px;
      height: 12px;
      border-radius: 3px;
      display: inline-block;
    }

    .segmented {
      display: inline-flex;
      padding: 4px;
      gap: 4px;
      border-radius: 999px;
      background: var(--bg);
      border: 1px solid var(--border);
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 7px 14px;
      font-size: 0.9rem;
      font-weight: 600;
      cursor: pointer;
      background: transparent;
      color: var(--muted);
    }

    .segmented button.active {
      background: var(--card);
      color: var(--ink);
      box-shadow: 0 4px 10px rgba(0, 0, 0, 0.08);
    }

    .solid {
      background: var(--accent);
      color: white;
    }

    .outline {
      border: 1px solid var(--border);
      color: var(--ink);
    }

    .chart-card {
      position: relative;
      background: var(--card);
      border: 1px solid var(--border);
      border-radius: 16px;
      padding: 16px;
      box-shadow: var(--shadow);
    }

    #chart {
      width: 100%;
      height: 380px;
      display: block;
    }

    .legend {
      display: flex;
      flex-wrap: wrap;
      justify-content: center;
      gap: 18px;
      margin-top: 8px;
      font-size: 0.9rem;
    }

    .legend span {
      display: inline-flex;
      align-items: center;
      gap: 6px;
    }

    .zoom {
      display: grid;
      grid-template-columns: auto 1fr 1fr auto;
      align-items: center;
      gap: 12px;
      margin-top: 12px;
      font-size: 0.85rem;
      color: var(--muted);
    }

    .tooltip {
      position: absolute;
      pointer-events: none;
      min-width: 200px;
      background: var(--card);
      border: 1px solid var(--border);
      border-radius: 10px;
      padding: 10px 12px;
      box-shadow: var(--shadow);
      font-size: 0.85rem;
      display: none;
    }

    .tooltip .date {
      font-weight: 600;
      margin-bottom: 6px;
    }

    .tooltip .entry {
      display: grid;
      gap: 2px;
      padding: 6px 0;
      border-top: 1px solid var(--border);
    }

    .tooltip .row {
      display: flex;
      justify-content: space-between;
      gap: 12px;
    }

    .status {
      min-height: 1.2em;
      font-size: 0.9rem;
      color: var(--muted);
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .empty {
      fill: var(--muted);
      font-size: 14px;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Conversion Rate Dashboard</h1>
      <p class="subtitle">{{VARIATIONS}} variations, {{DAYS}} days of data ({{FIRST_DATE}} to {{LAST_DATE}}).</p>
    </header>

    <section class="controls">
      <div class="variations" id="variations"></div>
      <div class="right-controls">
        <div class="segmented" id="line-style">
          <button type="button" data-value="line">Line</button>
          <button type="button" data-value="smooth">Smooth</button>
          <button type="button" data-value="area">Area</button>
        </div>
        <div class="segmented" id="granularity">
          <button type="button" data-value="day">Day</button>
          <button type="button" data-value="week">Week</button>
        </div>
        <button type="button" class="solid" id="export" aria-label="Export chart as PNG">Export PNG</button>
        <button type="button" class="outline" id="theme">Dark</button>
      </div>
    </section>

    <section class="chart-card" id="chart-card">
      <svg id="chart" viewBox="0 0 900 380" role="img" aria-label="Conversion rate chart" xmlns="http://www.w3.org/2000/svg"></svg>
      <div class="legend" id="legend"></div>
      <div class="zoom">
        <span>Zoom</span>
        <input type="range" id="zoom-start" min="0" value="0" />
        <input type="range" id="zoom-end" min="0" value="0" />
        <button type="button" class="outline" id="reset-zoom" hidden>Reset Zoom</button>
      </div>
      <div class="tooltip" id="tooltip"></div>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const chartEl = document.getElementById('chart');
    const legendEl = document.getElementById('legend');
    const variationsEl = document.getElementById('variations');
    const tooltipEl = document.getElementById('tooltip');
    const statusEl = document.getElementById('status');
    const zoomStartEl = document.getElementById('zoom-start');
    const zoomEndEl = document.getElementById('zoom-end');
    const resetZoomEl = document.getElementById('reset-zoom');
    const themeEl = document.getElementById('theme');

    const WIDTH = 900;
    const HEIGHT = 380;
    const PAD_LEFT = 56;
    const PAD_RIGHT = 20;
    const PAD_TOP = 20;
    const PAD_BOTTOM = 40;

    let view = null;
    let zoom = null;
    let hoverIndex = null;
    let detailRequest = 0;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const cssVar = (name) => getComputedStyle(document.documentElement).getPropertyValue(name).trim();

    const escapeText = (value) => String(value)
      .replace(/&/g, '&amp;')
      .replace(/</g, '&lt;')
      .replace(/>/g, '&gt;');

    const api = async (path, body) => {
      const options = body === undefined ? {} : {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body)
      };
      const res = await fetch(path, options);
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || `Request to ${path} failed`);
      }
      return res.json();
    };

    const visibleWindow = () => {
      const count = view ? view.points.length : 0;
      if (!zoom) {
        return [0, Math.max(count - 1, 0)];
      }
      return zoom;
    };

    const segmentsFor = (id, start, end, x, y) => {
      const segments = [];
      let current = [];
      for (let i = start; i <= end; i += 1) {
        const value = view.points[i][id];
        if (typeof value === 'number') {
          current.push([x(i), y(value)]);
        } else if (current.length) {
          segments.push(current);
          current = [];
        }
      }
      if (current.length) {
        segments.push(current);
      }
      return segments;
    };

    const linearPath = (pts) => pts
      .map(([px, py], index) => `${index === 0 ? 'M' : 'L'} ${px.toFixed(2)} ${py.toFixed(2)}`)
      .join(' ');

    const monotonePath = (pts) => {
      if (pts.length < 3) {
        return linearPath(pts);
      }
      const n = pts.length;
      const slopes = [];
      for (let i = 0; i < n - 1; i += 1) {
        slopes.push((pts[i + 1][1] - pts[i][1]) / (pts[i + 1][0] - pts[i][0]));
      }
      const tangents = [slopes[0]];
      for (let i = 1; i < n - 1; i += 1) {
        tangents.push(slopes[i - 1] * slopes[i] <= 0 ? 0 : (slopes[i - 1] + slopes[i]) / 2);
      }
      tangents.push(slopes[n - 2]);
      for (let i = 0; i < n - 1; i += 1) {
        if (slopes[i] === 0) {
          tangents[i] = 0;
          tangents[i + 1] = 0;
          continue;
        }
        const a = tangents[i] / slopes[i];
        const b = tangents[i + 1] / slopes[i];
        const h = a * a + b * b;
        if (h > 9) {
          const t = 3 / Math.sqrt(h);
          tangents[i] = t * a * slopes[i];
          tangents[i + 1] = t * b * slopes[i];
        }
      }
      let d = `M ${pts[0][0].toFixed(2)} ${pts[0][1].toFixed(2)}`;
      for (let i = 0; i < n - 1; i += 1) {
        const dx = (pts[i + 1][0] - pts[i][0]) / 3;
        const c1 = [pts[i][0] + dx, pts[i][1] + tangents[i] * dx];
        const c2 = [pts[i + 1][0] - dx, pts[i + 1][1] - tangents[i + 1] * dx];
        d += ` C ${c1[0].toFixed(2)} ${c1[1].toFixed(2)}, ${c2[0].toFixed(2)} ${c2[1].toFixed(2)}, ${pts[i + 1][0].toFixed(2)} ${pts[i + 1][1].toFixed(2)}`;
      }
      return d;
    };

    const renderChart = () => {
      if (!view || !view.points.length || !view.selected.length) {
        chartEl.innerHTML = `<text class="empty" x="50%" y="50%" text-anchor="middle">No data available</text>`;
        legendEl.innerHTML = '';
        return;
      }

      const [start, end] = visibleWindow();
      const span = Math.max(end - start, 1);
      const { min, max } = view.range;
      const yRange = max - min || 1;
      const plotWidth = WIDTH - PAD_LEFT - PAD_RIGHT;
      const plotHeight = HEIGHT - PAD_TOP - PAD_BOTTOM;
      const x = (index) => PAD_LEFT + ((index - start) / span) * plotWidth;
      const y = (value) => PAD_TOP + plotHeight - ((value - min) / yRange) * plotHeight;

      const gridColor = cssVar('--chart-grid');
      const axisColor = cssVar('--chart-axis');

      let grid = '';
      const ticks = 5;
      for (let i = 0; i <= ticks; i += 1) {
        const value = min + (yRange * i) / ticks;
        const yPos = y(value).toFixed(2);
        grid += `<line x1="${PAD_LEFT}" y1="${yPos}" x2="${WIDTH - PAD_RIGHT}" y2="${yPos}" stroke="${gridColor}" stroke-dasharray="3 3" />`;
        grid += `<text x="${PAD_LEFT - 8}" y="${Number(yPos) + 4}" text-anchor="end" fill="${axisColor}" font-size="12">${value.toFixed(1)}%</text>`;
      }

      const labelEvery = Math.max(1, Math.ceil((end - start + 1) / 8));
      let xLabels = '';
      for (let i = start; i <= end; i += 1) {
        if ((i - start) % labelEvery === 0) {
          xLabels += `<text x="${x(i).toFixed(2)}" y="${HEIGHT - PAD_BOTTOM + 20}" text-anchor="middle" fill="${axisColor}" font-size="12">${escapeText(view.labels[i])}</text>`;
        }
      }

      const baseline = y(min);
      let series = '';
      view.series.forEach(({ id, color }) => {
        const segments = segmentsFor(id, start, end, x, y);
        segments.forEach((pts) => {
          const line = view.line_style === 'line' ? linearPath(pts) : monotonePath(pts);
          if (view.line_style === 'area') {
            const first = pts[0];
            const last = pts[pts.length - 1];
            const fill = `${line} L ${last[0].toFixed(2)} ${baseline.toFixed(2)} L ${first[0].toFixed(2)} ${baseline.toFixed(2)} Z`;
            series += `<path d="${fill}" fill="${color}" fill-opacity="0.3" stroke="none" />`;
          }
          series += `<path d="${line}" fill="none" stroke="${color}" stroke-width="2" />`;
          if (pts.length === 1) {
            series += `<circle cx="${pts[0][0].toFixed(2)}" cy="${pts[0][1].toFixed(2)}" r="3" fill="${color}" />`;
          }
        });
      });

      let cursor = '';
      if (hoverIndex !== null && hoverIndex >= start && hoverIndex <= end) {
        const cx = x(hoverIndex).toFixed(2);
        cursor = `<line x1="${cx}" y1="${PAD_TOP}" x2="${cx}" y2="${HEIGHT - PAD_BOTTOM}" stroke="#999" stroke-dasharray="2 2" stroke-opacity="0.7" />`;
      }

      chartEl.innerHTML = `
        <rect x="0" y="0" width="${WIDTH}" height="${HEIGHT}" fill="${cssVar('--card')}" />
        ${grid}
        ${series}
        ${cursor}
        ${xLabels}
      `;

      legendEl.innerHTML = view.series
        .map(({ name, color }) => `<span><i class="swatch" style="background:${color}"></i>${escapeText(name)}</span>`)
        .join('');
    };

    const renderControls = (controls) => {
      variationsEl.innerHTML = '';
      controls.forEach((control) => {
        const label = document.createElement('label');
        label.className = 'variation-label';
        const input = document.createElement('input');
        input.type = 'checkbox';
        input.checked = control.selected;
        input.addEventListener('change', () => {
          toggleVariation(control.id).catch((err) => setStatus(err.message, 'error'));
        });
        const swatch = document.createElement('i');
        swatch.className = 'swatch';
        swatch.style.background = control.color;
        const name = document.createElement('span');
        name.textContent = control.name;
        label.append(input, swatch, name);
        variationsEl.append(label);
      });
    };

    const markActive = (groupId, value) => {
      document.querySelectorAll(`#${groupId} button`).forEach((button) => {
        button.classList.toggle('active', button.dataset.value === value);
      });
    };

    const syncZoomInputs = () => {
      const last = Math.max(view.points.length - 1, 0);
      const [start, end] = visibleWindow();
      zoomStartEl.max = String(last);
      zoomEndEl.max = String(last);
      zoomStartEl.value = String(start);
      zoomEndEl.value = String(end);
      resetZoomEl.hidden = zoom === null;
    };

    const applyView = (next) => {
      const granularityChanged = !view || view.granularity !== next.granularity;
      view = next;
      if (granularityChanged) {
        zoom = null;
      }
      markActive('line-style', view.line_style);
      markActive('granularity', view.granularity);
      syncZoomInputs();
      renderChart();
    };

    const loadControls = async () => {
      renderControls(await api('/api/variations'));
    };

    const toggleVariation = async (id) => {
      applyView(await api('/api/toggle', { variation_id: id }));
      await loadControls();
    };

    const onZoomInput = () => {
      let start = Number(zoomStartEl.value);
      let end = Number(zoomEndEl.value);
      if (start > end) {
        [start, end] = [end, start];
      }
      const last = view.points.length - 1;
      zoom = start === 0 && end === last ? null : [start, end];
      resetZoomEl.hidden = zoom === null;
      renderChart();
    };

    const hideTooltip = () => {
      hoverIndex = null;
      tooltipEl.style.display = 'none';
      renderChart();
    };

    const showTooltip = async (index, clientX, clientY) => {
      const point = view.points[index];
      const request = ++detailRequest;
      let detail;
      try {
        detail = await api(`/api/detail?date=${encodeURIComponent(point.date)}`);
      } catch (err) {
        tooltipEl.style.display = 'none';
        return;
      }
      if (request !== detailRequest || hoverIndex !== index || !detail.entries.length) {
        return;
      }
      tooltipEl.innerHTML = `<div class="date">${escapeText(detail.label)}</div>` + detail.entries
        .map((entry) => `
          <div class="entry">
            <div class="row"><span><i class="swatch" style="background:${entry.color}"></i> ${escapeText(entry.name)}</span></div>
            <div class="row"><span>Conversion Rate:</span><strong>${entry.rate.toFixed(2)}%</strong></div>
            <div class="row"><span>Visits:</span><strong>${entry.visits.toLocaleString()}</strong></div>
            <div class="row"><span>Conversions:</span><strong>${entry.conversions.toLocaleString()}</strong></div>
          </div>`)
        .join('');
      const card = document.getElementById('chart-card').getBoundingClientRect();
      tooltipEl.style.left = `${Math.min(clientX - card.left + 16, card.width - 220)}px`;
      tooltipEl.style.top = `${clientY - card.top + 16}px`;
      tooltipEl.style.display = 'block';
    };

    chartEl.addEventListener('mousemove', (event) => {
      if (!view || !view.points.length) {
        return;
      }
      const rect = chartEl.getBoundingClientRect();
      const svgX = ((event.clientX - rect.left) / rect.width) * WIDTH;
      const [start, end] = visibleWindow();
      const span = Math.max(end - start, 1);
      const ratio = (svgX - PAD_LEFT) / (WIDTH - PAD_LEFT - PAD_RIGHT);
      const index = Math.min(end, Math.max(start, Math.round(start + ratio * span)));
      if (index === hoverIndex) {
        return;
      }
      hoverIndex = index;
      renderChart();
      showTooltip(index, event.clientX, event.clientY);
    });

    chartEl.addEventListener('mouseleave', hideTooltip);
    zoomStartEl.addEventListener('input', onZoomInput);
    zoomEndEl.addEventListener('input', onZoomInput);
    resetZoomEl.addEventListener('click', () => {
      zoom = null;
      syncZoomInputs();
      renderChart();
    });

    document.querySelectorAll('#line-style button').forEach((button) => {
      button.addEventListener('click', () => {
        api('/api/line-style', { line_style: button.dataset.value })
          .then(applyView)
          .catch((err) => setStatus(err.message, 'error'));
      });
    });

    document.querySelectorAll('#granularity button').forEach((button) => {
      button.addEventListener('click', () => {
        api('/api/granularity', { granularity: button.dataset.value })
          .then(applyView)
          .catch((err) => setStatus(err.message, 'error'));
      });
    });

    themeEl.addEventListener('click', () => {
      const root = document.documentElement;
      const next = root.dataset.theme === 'dark' ? 'light' : 'dark';
      root.dataset.theme = next;
      themeEl.textContent = next === 'dark' ? 'Light' : 'Dark';
      renderChart();
    });

    const exportChart = async () => {
      if (!chartEl.firstElementChild) {
        return;
      }
      const markup = new XMLSerializer().serializeToString(chartEl);
      const url = URL.createObjectURL(new Blob([markup], { type: 'image/svg+xml' }));
      try {
        const image = await new Promise((resolve, reject) => {
          const img = new Image();
          img.onload = () => resolve(img);
          img.onerror = () => reject(new Error('could not rasterize chart'));
          img.src = url;
        });
        const canvas = document.createElement('canvas');
        canvas.width = WIDTH * 2;
        canvas.height = HEIGHT * 2;
        const ctx = canvas.getContext('2d');
        ctx.scale(2, 2);
        ctx.drawImage(image, 0, 0, WIDTH, HEIGHT);
        const link = document.createElement('a');
        link.download = `chart-${new Date().toISOString().split('T')[0]}.png`;
        link.href = canvas.toDataURL('image/png');
        link.click();
      } finally {
        URL.revokeObjectURL(url);
      }
    };

    document.getElementById('export').addEventListener('click', () => {
      exportChart().catch((err) => console.error('Failed to export chart:', err));
    });

    Promise.all([api('/api/view').then(applyView), loadControls()])
      .catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"##;
