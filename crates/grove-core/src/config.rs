use std::collections::HashMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow,
  bail
};
use tracing::{
  debug,
  info,
  trace,
  warn
};

#[derive(Debug, Clone)]
pub struct Config {
  map: HashMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    let mut map = HashMap::new();
    for (key, value) in [
      ("default.view", "tree"),
      ("color", "on"),
      ("seed", "on"),
      ("fetch.latency_ms", "800"),
      ("fetch.cache", "on"),
      ("fetch.fail_every", "0")
    ] {
      map.insert(
        key.to_string(),
        value.to_string()
      );
    }
    Self {
      map,
      loaded_files: vec![]
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    rc_override
  ))]
  pub fn load(
    rc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Config::default();

    let rc = resolve_rc_path(
      rc_override
    )?;
    if let Some(path) = rc {
      info!(groverc = %path.display(), "loading groverc");
      cfg.load_file(
        &path,
        &mut Vec::new()
      )?;
    } else {
      debug!(
        "no groverc found; using \
         defaults"
      );
    }

    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, value = %v, "applying override");
      self.map.insert(key, v);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.map.get(key).cloned()
  }

  pub fn get_bool(
    &self,
    key: &str
  ) -> Option<bool> {
    self
      .map
      .get(key)
      .map(|v| parse_bool(v))
  }

  pub fn get_u64(
    &self,
    key: &str
  ) -> anyhow::Result<Option<u64>> {
    self
      .map
      .get(key)
      .map(|v| {
        v.trim().parse::<u64>().with_context(
          || {
            format!(
              "invalid value for \
               {key}: {v}"
            )
          }
        )
      })
      .transpose()
  }

  pub fn iter(
    &self
  ) -> impl Iterator<Item = (&String, &String)>
  {
    self.map.iter()
  }

  /// Merge `path` and everything it includes. `chain` holds the
  /// files currently being read, outermost first.
  #[tracing::instrument(skip(
    self, chain
  ))]
  fn load_file(
    &mut self,
    path: &Path,
    chain: &mut Vec<PathBuf>
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let identity = fs::canonicalize(
      &path
    )
    .with_context(|| {
      format!(
        "failed to resolve {}",
        path.display()
      )
    })?;

    if chain.contains(&identity) {
      let cycle = chain
        .iter()
        .chain(std::iter::once(
          &identity
        ))
        .map(|p| {
          p.display().to_string()
        })
        .collect::<Vec<_>>()
        .join(" -> ");
      bail!("include cycle: {cycle}");
    }

    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;
    self
      .loaded_files
      .push(path.clone());

    let base_dir = path
      .parent()
      .map(Path::to_path_buf)
      .unwrap_or_else(|| {
        PathBuf::from(".")
      });

    chain.push(identity);
    for (idx, raw_line) in
      text.lines().enumerate()
    {
      let at = format!(
        "{}:{}",
        path.display(),
        idx + 1
      );
      match RcLine::parse(raw_line)
        .with_context(|| {
          format!(
            "invalid config line \
             {at}: {raw_line}"
          )
        })? {
        | RcLine::Blank => {}
        | RcLine::Include(target) => {
          let include =
            resolve_include_path(
              &base_dir, target
            )
            .with_context(|| {
              format!(
                "bad include at {at}"
              )
            })?;
          if !include.exists() {
            warn!(include = %include.display(), at = %at, "include file does not exist; skipping");
            continue;
          }
          debug!(include = %include.display(), at = %at, "following include");
          self.load_file(
            &include, chain
          )?;
        }
        | RcLine::Setting {
          key,
          value
        } => {
          trace!(key, value, "loaded config key");
          self.map.insert(
            key.to_string(),
            value.to_string()
          );
        }
      }
    }
    chain.pop();

    Ok(())
  }
}

/// One line of a groverc file.
#[derive(Debug, PartialEq, Eq)]
enum RcLine<'a> {
  Blank,
  Include(&'a str),
  Setting {
    key: &'a str,
    value: &'a str
  }
}

impl<'a> RcLine<'a> {
  fn parse(
    raw: &'a str
  ) -> anyhow::Result<Self> {
    let line = raw
      .split_once('#')
      .map_or(raw, |(before, _)| before)
      .trim();
    if line.is_empty() {
      return Ok(RcLine::Blank);
    }

    if let Some(target) =
      line.strip_prefix("include ")
    {
      return Ok(RcLine::Include(
        target.trim()
      ));
    }

    let (key, value) = line
      .split_once('=')
      .ok_or_else(|| {
        anyhow!("expected key = value")
      })?;
    let key = key.trim();
    if key.is_empty() {
      bail!("missing key before '='");
    }
    Ok(RcLine::Setting {
      key,
      value: value.trim()
    })
  }
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_rc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(rc_env) =
    std::env::var("GROVERC")
  {
    if rc_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      rc_env
    )));
  }

  let Some(home) = dirs::home_dir()
  else {
    warn!(
      "cannot determine home \
       directory; skipping ~/.groverc"
    );
    return Ok(None);
  };
  let candidate = home.join(".groverc");
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn resolve_include_path(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.trim().is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let raw = PathBuf::from(include);
  let expanded = expand_tilde(&raw);
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

pub(crate) fn parse_bool(
  s: &str
) -> bool {
  matches!(
    s.trim()
      .to_ascii_lowercase()
      .as_str(),
    "1" | "y" | "yes" | "on" | "true"
  )
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::{
    Config,
    RcLine
  };

  #[test]
  fn defaults_cover_every_known_key()
  {
    let cfg = Config::default();
    assert_eq!(
      cfg.get("default.view").as_deref(),
      Some("tree")
    );
    assert_eq!(
      cfg.get_bool("fetch.cache"),
      Some(true)
    );
    assert_eq!(
      cfg
        .get_u64("fetch.latency_ms")
        .expect("numeric"),
      Some(800)
    );
    assert_eq!(
      cfg
        .get_u64("fetch.fail_every")
        .expect("numeric"),
      Some(0)
    );
  }

  #[test]
  fn rc_file_with_include_and_comments()
  {
    let dir = tempfile::tempdir()
      .expect("tempdir");
    let extra = dir.path().join("extra.rc");
    fs::write(
      &extra,
      "fetch.fail_every = 3\n"
    )
    .expect("write include");
    let rc = dir.path().join("groverc");
    fs::write(
      &rc,
      "# demo\nfetch.latency_ms=5 # fast\ninclude extra.rc\ninclude missing.rc\ncolor = off\n"
    )
    .expect("write rc");

    let cfg = Config::load(Some(&rc))
      .expect("load rc");
    assert_eq!(
      cfg
        .get_u64("fetch.latency_ms")
        .expect("numeric"),
      Some(5)
    );
    assert_eq!(
      cfg
        .get_u64("fetch.fail_every")
        .expect("numeric"),
      Some(3)
    );
    assert_eq!(
      cfg.get_bool("color"),
      Some(false)
    );
    assert_eq!(
      cfg.loaded_files.len(),
      2
    );
  }

  #[test]
  fn malformed_line_is_an_error() {
    let dir = tempfile::tempdir()
      .expect("tempdir");
    let rc = dir.path().join("groverc");
    fs::write(&rc, "just words\n")
      .expect("write rc");

    let err = Config::load(Some(&rc))
      .expect_err("should fail");
    assert!(
      err
        .to_string()
        .contains("invalid config line")
    );
  }

  #[test]
  fn overrides_strip_rc_prefix() {
    let mut cfg = Config::default();
    cfg.apply_overrides(vec![
      (
        "rc.seed".to_string(),
        "off".to_string()
      ),
      (
        "fetch.latency_ms".to_string(),
        "nope".to_string()
      ),
    ]);
    assert_eq!(
      cfg.get_bool("seed"),
      Some(false)
    );
    assert!(
      cfg
        .get_u64("fetch.latency_ms")
        .is_err()
    );
  }

  #[test]
  fn self_include_is_a_cycle_error() {
    let dir = tempfile::tempdir()
      .expect("tempdir");
    let rc = dir.path().join("groverc");
    fs::write(
      &rc,
      "color = off\ninclude groverc\n"
    )
    .expect("write rc");

    let err = Config::load(Some(&rc))
      .expect_err("cycle");
    assert!(
      format!("{err:#}")
        .contains("include cycle")
    );
  }

  #[test]
  fn mutual_includes_are_a_cycle_error()
  {
    let dir = tempfile::tempdir()
      .expect("tempdir");
    fs::write(
      dir.path().join("a.rc"),
      "include b.rc\n"
    )
    .expect("write a");
    fs::write(
      dir.path().join("b.rc"),
      "seed = off\ninclude a.rc\n"
    )
    .expect("write b");

    let err = Config::load(Some(
      &dir.path().join("a.rc")
    ))
    .expect_err("cycle");
    let text = format!("{err:#}");
    assert!(text.contains("a.rc -> "));
    assert!(text.contains("b.rc -> "));
  }

  #[test]
  fn shared_include_loads_twice_without_error()
  {
    let dir = tempfile::tempdir()
      .expect("tempdir");
    fs::write(
      dir.path().join("common.rc"),
      "fetch.cache = off\n"
    )
    .expect("write common");
    fs::write(
      dir.path().join("view.rc"),
      "include common.rc\ndefault.view = kanban\n"
    )
    .expect("write view");
    let rc = dir.path().join("groverc");
    fs::write(
      &rc,
      "include common.rc\ninclude view.rc\n"
    )
    .expect("write rc");

    let cfg = Config::load(Some(&rc))
      .expect("load rc");
    assert_eq!(
      cfg.get_bool("fetch.cache"),
      Some(false)
    );
    assert_eq!(
      cfg.get("default.view").as_deref(),
      Some("kanban")
    );
    assert_eq!(
      cfg.loaded_files.len(),
      4
    );
  }

  #[test]
  fn rc_lines_classify() {
    assert_eq!(
      RcLine::parse("  # note")
        .expect("blank"),
      RcLine::Blank
    );
    assert_eq!(
      RcLine::parse("include  x.rc ")
        .expect("include"),
      RcLine::Include("x.rc")
    );
    assert_eq!(
      RcLine::parse("color = on # tty")
        .expect("setting"),
      RcLine::Setting {
        key:   "color",
        value: "on"
      }
    );
    assert!(
      RcLine::parse(" = on").is_err()
    );
    assert!(
      RcLine::parse("words").is_err()
    );
  }
}
