//! Package registry discovery
//!
//! Registries come from the nearest `nuget.config` above a manifest, falling
//! back to the configured defaults. Only `<packageSources>` is read:
//!
//! ```xml
//! <configuration>
//!   <packageSources>
//!     <clear />
//!     <add key="contoso" value="https://pkgs.contoso.com/v3/index.json" protocolVersion="3" />
//!   </packageSources>
//! </configuration>
//! ```

use std::sync::Arc;

use lockstep_fs::constants::REGISTRY_CONFIG_NAMES;
use lockstep_fs::{FileSystem, NormalizedPath};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// A package feed the restore may pull from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Registry {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: None,
        }
    }

    pub fn named(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: Some(name.into()),
        }
    }
}

/// A registry URL split into the feed address and its protocol version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryUrl {
    pub feed_url: String,
    pub protocol_version: u8,
}

/// Split a registry URL into feed address and protocol version.
///
/// An explicit `#protocolVersion=2` or `#protocolVersion=3` fragment wins.
/// Otherwise a feed whose path ends in `.json` is a v3 service index and
/// anything else is treated as v2.
pub fn parse_registry_url(url: &str) -> RegistryUrl {
    let (feed_url, fragment) = match url.split_once('#') {
        Some((feed, fragment)) => (feed, Some(fragment)),
        None => (url, None),
    };

    let explicit = fragment
        .and_then(|f| f.strip_prefix("protocolVersion="))
        .and_then(|v| v.parse::<u8>().ok())
        .filter(|v| matches!(v, 2 | 3));

    let protocol_version = explicit.unwrap_or_else(|| {
        let path = feed_url.split('?').next().unwrap_or(feed_url);
        if path.to_ascii_lowercase().ends_with(".json") { 3 } else { 2 }
    });

    RegistryUrl {
        feed_url: feed_url.to_string(),
        protocol_version,
    }
}

/// Where registries for a manifest come from.
pub trait RegistrySource: Send + Sync {
    /// Registries configured for `manifest`, searching up to `root_dir`.
    ///
    /// `Ok(None)` means nothing was configured and the defaults apply.
    fn configured_registries(
        &self,
        manifest: &NormalizedPath,
        root_dir: &NormalizedPath,
    ) -> Result<Option<Vec<Registry>>>;

    /// Registries used when nothing is configured.
    fn default_registries(&self) -> Vec<Registry>;

    /// Configured registries, or the defaults.
    fn registries_for(
        &self,
        manifest: &NormalizedPath,
        root_dir: &NormalizedPath,
    ) -> Result<Vec<Registry>> {
        Ok(self
            .configured_registries(manifest, root_dir)?
            .unwrap_or_else(|| self.default_registries()))
    }
}

/// [`RegistrySource`] that reads `nuget.config` files.
#[derive(Debug, Clone)]
pub struct NugetConfigRegistries {
    fs: Arc<dyn FileSystem>,
    defaults: Vec<Registry>,
}

impl NugetConfigRegistries {
    pub fn new(fs: Arc<dyn FileSystem>, defaults: Vec<Registry>) -> Self {
        Self { fs, defaults }
    }

    /// Nearest registry config at or above the manifest's directory.
    fn find_config(
        &self,
        manifest: &NormalizedPath,
        root_dir: &NormalizedPath,
    ) -> Result<Option<(NormalizedPath, String)>> {
        let root_dir = root_dir.clean();
        let mut dir = manifest.clean().parent();

        while let Some(current) = dir {
            for name in REGISTRY_CONFIG_NAMES {
                let candidate = current.join(name);
                if let Some(content) = self.fs.read_file(&candidate)? {
                    return Ok(Some((candidate, content)));
                }
            }
            if current == root_dir || current.strip_prefix(&root_dir).is_none() {
                break;
            }
            dir = current.parent();
        }
        Ok(None)
    }
}

impl RegistrySource for NugetConfigRegistries {
    fn configured_registries(
        &self,
        manifest: &NormalizedPath,
        root_dir: &NormalizedPath,
    ) -> Result<Option<Vec<Registry>>> {
        let Some((path, content)) = self.find_config(manifest, root_dir)? else {
            debug!(manifest = %manifest, "No registry configuration found");
            return Ok(None);
        };
        debug!(config = %path, "Reading registry configuration");

        parse_package_sources(&content, self.default_registries()).map_err(|message| {
            Error::RegistryConfig {
                path: path.to_native(),
                message,
            }
        })
    }

    fn default_registries(&self) -> Vec<Registry> {
        self.defaults.clone()
    }
}

/// Apply the `<packageSources>` of a registry config on top of `defaults`.
///
/// Returns `Ok(None)` when the document has no `<packageSources>` section.
fn parse_package_sources(
    content: &str,
    defaults: Vec<Registry>,
) -> std::result::Result<Option<Vec<Registry>>, String> {
    let mut reader = Reader::from_str(content.trim_start_matches('\u{feff}'));
    let mut open: Vec<String> = Vec::new();
    let mut registries = defaults;
    let mut found = false;

    loop {
        let event = reader.read_event().map_err(|e| e.to_string())?;
        let (element, is_empty) = match event {
            Event::Start(element) => (element, false),
            Event::Empty(element) => (element, true),
            Event::End(_) => {
                open.pop();
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };

        let name = local_name(&element);
        let in_sources = open.len() == 2
            && open[0] == "configuration"
            && open[1].eq_ignore_ascii_case("packageSources");

        if open.len() == 1 && open[0] == "configuration" && name.eq_ignore_ascii_case("packageSources") {
            found = true;
        } else if in_sources && name == "clear" {
            registries.clear();
        } else if in_sources && name == "add" {
            if let Some(registry) = source_entry(&element)? {
                registries.push(registry);
            }
        }

        if !is_empty {
            open.push(name);
        }
    }

    if !open.is_empty() {
        return Err(format!("element <{}> is never closed", open[open.len() - 1]));
    }

    Ok(found.then_some(registries))
}

fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).into_owned()
}

/// Turn an `<add key=".." value=".." />` entry into a registry.
///
/// Local folder sources are skipped; only HTTP feeds can be added to a
/// temporary configuration.
fn source_entry(element: &BytesStart<'_>) -> std::result::Result<Option<Registry>, String> {
    let mut key = None;
    let mut value = None;
    let mut protocol_version = None;

    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let text = attribute.unescape_value().map_err(|e| e.to_string())?.into_owned();
        match attribute.key.local_name().as_ref() {
            b"key" => key = Some(text),
            b"value" => value = Some(text),
            b"protocolVersion" => protocol_version = Some(text),
            _ => {}
        }
    }

    let Some(value) = value else {
        return Ok(None);
    };
    let lower = value.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        debug!(source = %value, "Skipping non-HTTP package source");
        return Ok(None);
    }

    let url = match protocol_version {
        Some(version) => format!("{value}#protocolVersion={version}"),
        None => value,
    };
    Ok(Some(Registry { url, name: key }))
}
