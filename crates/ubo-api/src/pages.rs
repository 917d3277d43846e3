//! # Server-Rendered Pages
//!
//! HTML for the two views. Both share one shell: a navbar linking to the
//! about page, the page body, and the Open State Foundation footer.
//!
//! The home view renders the accordion from the category registry and an
//! empty map container. A small script asks `/v1/home/update` for the
//! panel flags and figure on load and on every toggle click, and keeps the
//! returned index in `sessionStorage` so a visit to `/about` and back
//! restores the open category.

use ubo_core::{CategoryDefinition, CategoryIndex, CategoryRegistry, ToggleEvent, View};

/// Document title for both views.
pub const PAGE_TITLE: &str =
    "UBO Atlas - an overview of Ultimate Beneficial Ownership registers across the EU";

const NAVBAR_COLOR: &str = "#204C72";

const FOOTER_LOGO: &str = "/static/Open_State_Foundation_logo_tagline_en_transparent.svg";

const MOBILE_HINT: &str = "Click on one of the categories below, then scroll down to see the \
                           corresponding map with the results";

const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@4.6.2/dist/css/bootstrap.min.css";

const STYLE: &str = r#"
body { font-family: 'Mulish', sans-serif; }
.bg-orange { background-color: #FFF0E6; }
.accordion .card-header h2 { margin: 0; }
.collapse-button { text-align: left; width: 100%; }
.collapse:not(.show) { display: none; }
.legend-color { display: inline-block; width: 1em; height: 1em; vertical-align: middle; }
#choropleth { min-height: 80vh; }
#map-error { color: #FF4E4E; }
.footer { text-align: center; padding: 2em 0; }
"#;

const SCRIPT: &str = r#"
(function () {
  const KEY = "ubo-atlas-active";
  const config = {
    modeBarButtonsToRemove: ["select2d", "lasso2d", "pan2d", "zoom2d", "autoScale2d", "resetScale2d"],
    scrollZoom: false,
  };

  // Responses can arrive out of order; only the newest request may paint.
  let latest = 0;

  async function update(trigger) {
    const seq = ++latest;
    const body = {};
    const stored = sessionStorage.getItem(KEY);
    if (stored !== null) body.active = Number(stored);
    if (trigger) body.trigger = trigger;

    const res = await fetch("/v1/home/update", {
      method: "POST",
      headers: { "content-type": "application/json" },
      body: JSON.stringify(body),
    });
    if (seq !== latest) return;
    if (res.status === 422 && !trigger && stored !== null) {
      sessionStorage.removeItem(KEY);
      return update(null);
    }
    const payload = await res.json();
    if (seq !== latest) return;
    const error = document.getElementById("map-error");
    if (!res.ok) {
      error.textContent = payload.error.message;
      return;
    }
    error.textContent = "";

    payload.open.forEach(function (open, i) {
      const panel = document.getElementById("collapse-" + i);
      if (panel) panel.classList.toggle("show", open);
    });
    if (payload.active === null) sessionStorage.removeItem(KEY);
    else sessionStorage.setItem(KEY, String(payload.active));
    Plotly.react("choropleth", payload.figure.data, payload.figure.layout, config);
  }

  document.querySelectorAll(".collapse-button").forEach(function (button) {
    button.addEventListener("click", function () { update(button.id); });
  });
  update(null);
})();
"#;

/// Escape text for inclusion in HTML content or attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render a view.
pub fn render(view: View, registry: &CategoryRegistry) -> String {
    match view {
        View::Home => home_page(registry),
        View::About => about_page(),
    }
}

/// The accordion plus map container.
pub fn home_page(registry: &CategoryRegistry) -> String {
    let cards: String = registry
        .iter()
        .map(|(index, category)| category_card(index, category))
        .collect();

    let body = format!(
        r#"<div class="container-fluid">
  <div class="row">
    <div class="d-md-none bg-orange">{hint}</div>
    <div class="accordion col-12 col-md-4">
{cards}    </div>
    <div class="col-12 col-md-8 bg-orange">
      <div id="map-error" role="alert"></div>
      <div id="choropleth"></div>
    </div>
  </div>
</div>
<script src="{plotly}"></script>
<script>{script}</script>"#,
        hint = MOBILE_HINT,
        plotly = PLOTLY_SRC,
        script = SCRIPT,
    );
    shell(&body)
}

fn category_card(index: CategoryIndex, category: &CategoryDefinition) -> String {
    let legend: String = category
        .legend()
        .iter()
        .map(|entry| {
            format!(
                r#"          <div><div class="legend-color" style="background-color: {color}"></div><span> {label}</span></div>
"#,
                color = entry.color,
                label = html_escape(&entry.label),
            )
        })
        .collect();

    format!(
        r#"      <div class="card">
        <div class="card-header">
          <h2><button class="btn btn-link collapse-button" id="{toggle}" type="button">{title}</button></h2>
        </div>
        <div class="collapse" id="collapse-{index}">
          <div class="card-body">
          {description}<br><br>
{legend}          </div>
        </div>
      </div>
"#,
        toggle = ToggleEvent::control_id(index),
        title = html_escape(&category.title),
        description = html_escape(&category.description),
    )
}

/// Background text and dataset downloads.
pub fn about_page() -> String {
    let body = r#"<div class="container">
  <br>
  <h1>About UBO Atlas</h1>
  <p>Anonymous companies and other legal entities are vehicles that are frequently used by malicious individuals to commit financial crimes such as money laundering, cross-border corruption, environmental crimes and even human trafficking. The Panama Papers and LuxLeaks have proven this to be the case. And because of the anonymous character of these companies, the real individuals behind these entities are often not held accountable for their harmful and illegal actions.</p>
  <p>To combat this, the European Union has taken significant steps to increase the transparency in company ownership with the 4th and 5h Anti Money Laundering Directive (AMLD). One of the instruments of the AMLD is enforcing member states to open up their beneficial ownership registers to the public. This recognizes the value of public oversight and scrutiny of who owns a company and who is pulling the strings. Not only to fight financial crime, but also to ensure public trust in the financial system and ensure that companies can easily find out who they are in business with.</p>
  <p>Three years after the adoption of AMLD 5 and a year after the deadline for member states to install and open up the beneficial ownership registers, the UBO Atlas showcases the current state of play in the European Union. It showcases the specifics regarding the implementation and accessibility of beneficial ownership registers in EU member states. The UBO Atlas builds upon <a href="https://www.transparency.org/en/publications/access-denied-availability-accessibility-beneficial-ownership-registers-data-european-union" target="_blank" rel="noopener">research executed by Transparency International</a>. Over the course of the next couple of months more details about these beneficial ownerships will be added to the UBO Atlas.</p>
  <p>If information is incorrect or not up to date anymore - please contact <a href="mailto:jesse@openstate.eu" target="_blank" rel="noopener">jesse@openstate.eu</a> with supporting evidence. This will be analysed and if sufficient proof is available the data presented in the UBO Atlas will be updated.</p>
  <br>
  <h1>Data</h1>
  <p><a href="/static/ubo_atlas_data.csv">Main dataset (csv)</a></p>
  <p><a href="/static/ubo_atlas_data_fields.csv">Data fields dataset (csv)</a></p>
  <p><a href="/static/ubo_atlas_data_tooltips.csv">Tooltip dataset (csv)</a></p>
  <br>
  <br>
</div>"#;
    shell(body)
}

fn shell(content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="{bootstrap}">
<style>{style}</style>
</head>
<body>
<nav class="navbar navbar-expand navbar-dark" style="background-color: {navbar}">
  <div class="container-fluid">
    <a class="navbar-brand" href="/">&nbsp;</a>
    <ul class="navbar-nav ml-auto">
      <li class="nav-item"><a class="nav-link" href="/about">About</a></li>
    </ul>
  </div>
</nav>
<div id="page-content" class="bg-orange">
{content}
</div>
<footer>
  <div class="footer">
    <a href="https://openstate.eu/" target="_blank" rel="noopener"><img src="{logo}" class="img-fluid" width="500" alt="Open State Foundation logo with tagline 'open data, transparent society'"></a>
  </div>
</footer>
</body>
</html>
"#,
        title = html_escape(PAGE_TITLE),
        bootstrap = BOOTSTRAP_CSS,
        style = STYLE,
        navbar = NAVBAR_COLOR,
        logo = FOOTER_LOGO,
    )
}
