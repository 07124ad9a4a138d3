//! Template catalog for repository scaffolding.
//!
//! Each built-in template is a versioned definition with a parameterized
//! file set. Resolving a template renders every file for a concrete target
//! repository name and description; the result is handed to the scaffold
//! orchestrator as-is.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Container-oriented TypeScript service. Also the catalog default.
pub const TEMPLATE_CONTAINER_SERVICE: &str = "container-service";

/// Serverless web app deployed to Vercel.
pub const TEMPLATE_SERVERLESS_APP: &str = "serverless-app";

/// Containerized Python queue worker.
pub const TEMPLATE_PYTHON_WORKER: &str = "python-worker";

/// Template used when a caller asks for an id the catalog does not know.
pub const DEFAULT_TEMPLATE_ID: &str = TEMPLATE_CONTAINER_SERVICE;

/// Deploy target identifiers understood by the command generator.
pub const DEPLOY_TARGET_DOCKER: &str = "docker";
pub const DEPLOY_TARGET_VERCEL: &str = "vercel";

/// Longest repository name the hosting platform accepts.
pub const MAX_TARGET_NAME_LENGTH: usize = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single rendered file belonging to a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFile {
    pub path: String,
    pub content: String,
}

/// A template materialized for one scaffold call. All placeholders in
/// `files` have already been substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoTemplate {
    pub name: String,
    pub version: String,
    pub language: String,
    pub deploy_target: String,
    pub secrets: Vec<String>,
    pub files: Vec<TemplateFile>,
}

/// Outcome of a catalog lookup.
///
/// `fell_back` is set when `requested_id` was not a catalog id and the
/// default template was substituted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResolution {
    pub requested_id: String,
    pub fell_back: bool,
    pub template: RepoTemplate,
}

/// Static description of a catalog entry.
struct TemplateDefinition {
    id: &'static str,
    version: &'static str,
    language: &'static str,
    deploy_target: &'static str,
    secrets: &'static [&'static str],
    architecture: &'static [&'static str],
    getting_started: &'static [&'static str],
    render_extra: fn(&RenderContext<'_>) -> Vec<TemplateFile>,
    render_manifest: fn(&RenderContext<'_>) -> TemplateFile,
}

/// Values substituted into a definition's files.
struct RenderContext<'a> {
    definition: &'a TemplateDefinition,
    name: &'a str,
    description: &'a str,
}

const CATALOG: &[TemplateDefinition] = &[
    TemplateDefinition {
        id: TEMPLATE_CONTAINER_SERVICE,
        version: "1.2.0",
        language: "typescript",
        deploy_target: DEPLOY_TARGET_DOCKER,
        secrets: &["DATABASE_URL", "API_KEY"],
        architecture: &[
            "**Runtime:** Node.js 20 (TypeScript) packaged as a container image",
            "**Build:** multi-stage `Dockerfile` (dependencies, compile, slim runtime)",
            "**Deploy target:** `docker`, serving HTTP on port 3000",
        ],
        getting_started: &[
            "npm install",
            "npm run build",
            "docker build -t {{name}} .",
            "docker run -p 3000:3000 {{name}}",
        ],
        render_extra: container_service_extras,
        render_manifest: node_manifest,
    },
    TemplateDefinition {
        id: TEMPLATE_SERVERLESS_APP,
        version: "1.0.3",
        language: "typescript",
        deploy_target: DEPLOY_TARGET_VERCEL,
        secrets: &["NEXT_PUBLIC_API_URL", "API_SECRET"],
        architecture: &[
            "**Framework:** Next.js with API routes as serverless functions",
            "**Hosting:** Vercel, one preview deployment per branch",
            "**Deploy target:** `vercel`",
        ],
        getting_started: &["npm install", "npm run build", "vercel --prod"],
        render_extra: serverless_app_extras,
        render_manifest: node_manifest,
    },
    TemplateDefinition {
        id: TEMPLATE_PYTHON_WORKER,
        version: "0.4.1",
        language: "python",
        deploy_target: DEPLOY_TARGET_DOCKER,
        secrets: &["QUEUE_URL", "WORKER_TOKEN"],
        architecture: &[
            "**Runtime:** Python 3.12 queue consumer",
            "**Build:** multi-stage `Dockerfile` (wheel build, slim runtime)",
            "**Deploy target:** `docker`",
        ],
        getting_started: &[
            "pip install -e .",
            "docker build -t {{name}} .",
            "docker run {{name}}",
        ],
        render_extra: python_worker_extras,
        render_manifest: python_manifest,
    },
];

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// All template ids in catalog order.
pub fn template_ids() -> Vec<&'static str> {
    CATALOG.iter().map(|d| d.id).collect()
}

/// Validate the name of a repository about to be scaffolded.
///
/// Names are ASCII letters, digits, `-`, `_` and `.`, and may not be `.`
/// or `..`.
pub fn validate_target_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::Validation(
            "Repository name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_TARGET_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Repository name must not exceed {MAX_TARGET_NAME_LENGTH} characters"
        )));
    }
    if name == "." || name == ".." {
        return Err(CoreError::Validation(format!(
            "'{name}' is not a valid repository name"
        )));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(CoreError::Validation(format!(
            "Repository name '{name}' contains invalid character '{bad}'"
        )));
    }
    Ok(())
}

/// Resolve and render a template for `target_name`.
///
/// An unrecognized id resolves to [`DEFAULT_TEMPLATE_ID`] with
/// `fell_back = true`; the caller decides whether to surface that.
pub fn resolve_template(
    template_id: &str,
    target_name: &str,
    description: &str,
) -> TemplateResolution {
    let (definition, fell_back) = match find_definition(template_id) {
        Some(definition) => (definition, false),
        None => (default_definition(), true),
    };

    let description = description.trim();
    let fallback_description;
    let description = if description.is_empty() {
        fallback_description = format!("Service scaffolded from the {} template.", definition.id);
        fallback_description.as_str()
    } else {
        description
    };

    let ctx = RenderContext {
        definition,
        name: target_name,
        description,
    };

    TemplateResolution {
        requested_id: template_id.to_string(),
        fell_back,
        template: render(&ctx),
    }
}

fn find_definition(template_id: &str) -> Option<&'static TemplateDefinition> {
    let id = template_id.trim();
    CATALOG.iter().find(|d| d.id == id)
}

fn default_definition() -> &'static TemplateDefinition {
    CATALOG
        .iter()
        .find(|d| d.id == DEFAULT_TEMPLATE_ID)
        .unwrap_or(&CATALOG[0])
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(ctx: &RenderContext<'_>) -> RepoTemplate {
    let definition = ctx.definition;

    let mut files = vec![
        readme(ctx),
        (definition.render_manifest)(ctx),
        env_example(ctx),
    ];
    files.extend((definition.render_extra)(ctx));

    RepoTemplate {
        name: definition.id.to_string(),
        version: definition.version.to_string(),
        language: definition.language.to_string(),
        deploy_target: definition.deploy_target.to_string(),
        secrets: definition.secrets.iter().map(|s| s.to_string()).collect(),
        files,
    }
}

/// Substitute `{{name}}`, `{{description}}`, `{{template}}` and
/// `{{version}}` in `body`.
fn substitute(body: &str, ctx: &RenderContext<'_>) -> String {
    body.replace("{{name}}", ctx.name)
        .replace("{{description}}", ctx.description)
        .replace("{{template}}", ctx.definition.id)
        .replace("{{version}}", ctx.definition.version)
}

fn file(path: &str, content: String) -> TemplateFile {
    TemplateFile {
        path: path.to_string(),
        content,
    }
}

fn readme(ctx: &RenderContext<'_>) -> TemplateFile {
    let definition = ctx.definition;
    let mut out = substitute("# {{name}}\n\n{{description}}\n\n## Architecture\n\n", ctx);

    for line in definition.architecture {
        out.push_str("- ");
        out.push_str(line);
        out.push('\n');
    }

    out.push_str("\n## Configuration\n\nCopy `.env.example` to `.env` and set:\n\n");
    for secret in definition.secrets {
        out.push_str(&format!("- `{secret}`\n"));
    }

    out.push_str("\n## Getting started\n\n```sh\n");
    for step in definition.getting_started {
        out.push_str(&substitute(step, ctx));
        out.push('\n');
    }
    out.push_str("```\n\n");
    out.push_str(&substitute(
        "_Scaffolded from template `{{template}}` v{{version}}._\n",
        ctx,
    ));

    file("README.md", out)
}

fn env_example(ctx: &RenderContext<'_>) -> TemplateFile {
    let mut out = substitute("# Environment for {{name}}\n", ctx);
    for secret in ctx.definition.secrets {
        out.push_str(secret);
        out.push_str("=\n");
    }
    file(".env.example", out)
}

fn node_manifest(ctx: &RenderContext<'_>) -> TemplateFile {
    let start = if ctx.definition.deploy_target == DEPLOY_TARGET_VERCEL {
        "next start"
    } else {
        "node dist/index.js"
    };
    let build = if ctx.definition.deploy_target == DEPLOY_TARGET_VERCEL {
        "next build"
    } else {
        "tsc -p ."
    };

    let manifest = serde_json::json!({
        "name": ctx.name,
        "version": "0.1.0",
        "private": true,
        "description": ctx.description,
        "scripts": {
            "build": build,
            "start": start,
        },
        "repodeck": {
            "template": ctx.definition.id,
            "templateVersion": ctx.definition.version,
            "deployTarget": ctx.definition.deploy_target,
        },
    });

    // Serializing a `json!` value cannot fail.
    let mut content = serde_json::to_string_pretty(&manifest).unwrap_or_default();
    content.push('\n');
    file("package.json", content)
}

/// `pyproject.toml` layout rendered for Python templates.
#[derive(Serialize)]
struct PyProject<'a> {
    project: PyProjectMeta<'a>,
    tool: PyProjectTools<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct PyProjectMeta<'a> {
    name: &'a str,
    version: &'a str,
    description: &'a str,
    requires_python: &'a str,
}

#[derive(Serialize)]
struct PyProjectTools<'a> {
    repodeck: ToolRepodeck<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct ToolRepodeck<'a> {
    template: &'a str,
    template_version: &'a str,
    deploy_target: &'a str,
}

fn python_manifest(ctx: &RenderContext<'_>) -> TemplateFile {
    let manifest = PyProject {
        project: PyProjectMeta {
            name: ctx.name,
            version: "0.1.0",
            description: ctx.description,
            requires_python: ">=3.12",
        },
        tool: PyProjectTools {
            repodeck: ToolRepodeck {
                template: ctx.definition.id,
                template_version: ctx.definition.version,
                deploy_target: ctx.definition.deploy_target,
            },
        },
    };

    // Tables of plain strings always serialize.
    let content = toml::to_string_pretty(&manifest).unwrap_or_default();
    file("pyproject.toml", content)
}

const NODE_DOCKERFILE: &str = "\
# syntax=docker/dockerfile:1
FROM node:20-alpine AS deps
WORKDIR /app
COPY package*.json ./
RUN npm ci

FROM node:20-alpine AS build
WORKDIR /app
COPY --from=deps /app/node_modules ./node_modules
COPY . .
RUN npm run build

FROM node:20-alpine AS runtime
LABEL org.opencontainers.image.title=\"{{name}}\"
WORKDIR /app
ENV NODE_ENV=production
COPY --from=deps /app/node_modules ./node_modules
COPY --from=build /app/dist ./dist
COPY package.json ./
EXPOSE 3000
CMD [\"node\", \"dist/index.js\"]
";

const PYTHON_DOCKERFILE: &str = "\
# syntax=docker/dockerfile:1
FROM python:3.12-slim AS build
WORKDIR /src
COPY . .
RUN pip wheel --no-deps --wheel-dir /wheels .

FROM python:3.12-slim AS runtime
LABEL org.opencontainers.image.title=\"{{name}}\"
COPY --from=build /wheels /wheels
RUN pip install --no-cache-dir /wheels/*.whl
CMD [\"python\", \"-m\", \"worker\"]
";

fn container_service_extras(ctx: &RenderContext<'_>) -> Vec<TemplateFile> {
    vec![
        file("Dockerfile", substitute(NODE_DOCKERFILE, ctx)),
        file(
            ".dockerignore",
            "node_modules\ndist\n.env\n.git\n".to_string(),
        ),
    ]
}

fn serverless_app_extras(ctx: &RenderContext<'_>) -> Vec<TemplateFile> {
    let config = serde_json::json!({
        "$schema": "https://openapi.vercel.sh/vercel.json",
        "name": ctx.name,
        "framework": "nextjs",
    });
    let mut content = serde_json::to_string_pretty(&config).unwrap_or_default();
    content.push('\n');
    vec![file("vercel.json", content)]
}

fn python_worker_extras(ctx: &RenderContext<'_>) -> Vec<TemplateFile> {
    vec![file("Dockerfile", substitute(PYTHON_DOCKERFILE, ctx))]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn find_file<'a>(template: &'a RepoTemplate, path: &str) -> &'a TemplateFile {
        template
            .files
            .iter()
            .find(|f| f.path == path)
            .unwrap_or_else(|| panic!("{} has no {path}", template.name))
    }

    #[test]
    fn unknown_id_matches_default_resolution() {
        let fallback = resolve_template("no-such-template", "svc", "desc");
        let default = resolve_template(DEFAULT_TEMPLATE_ID, "svc", "desc");

        assert!(fallback.fell_back);
        assert!(!default.fell_back);
        assert_eq!(fallback.template, default.template);
        assert_eq!(fallback.requested_id, "no-such-template");
    }

    #[test]
    fn every_template_renders_required_files() {
        for id in template_ids() {
            let resolution = resolve_template(id, "atlas-svc", "Atlas service");
            let template = &resolution.template;
            assert!(!resolution.fell_back, "{id} should resolve directly");

            let readme = find_file(template, "README.md");
            assert!(readme.content.contains("## Architecture"), "{id} README");
            assert!(readme.content.contains("atlas-svc"), "{id} README name");

            let manifest = template
                .files
                .iter()
                .find(|f| f.path == "package.json" || f.path == "pyproject.toml")
                .unwrap_or_else(|| panic!("{id} has no manifest"));
            assert!(manifest.content.contains("atlas-svc"), "{id} manifest");

            let env = find_file(template, ".env.example");
            for secret in &template.secrets {
                assert!(env.content.contains(secret.as_str()), "{id} missing {secret}");
            }
        }
    }

    #[test]
    fn container_template_has_multi_stage_dockerfile() {
        let template = resolve_template(TEMPLATE_CONTAINER_SERVICE, "svc", "").template;
        let dockerfile = find_file(&template, "Dockerfile");
        let stages = dockerfile
            .content
            .lines()
            .filter(|l| l.starts_with("FROM ") && l.contains(" AS "))
            .count();
        assert!(stages >= 2, "expected a multi-stage build, got {stages} stage(s)");
        assert_eq!(template.deploy_target, DEPLOY_TARGET_DOCKER);
    }

    #[test]
    fn serverless_template_targets_vercel() {
        let template = resolve_template(TEMPLATE_SERVERLESS_APP, "web", "").template;
        assert_eq!(template.deploy_target, DEPLOY_TARGET_VERCEL);
        assert!(template.files.iter().any(|f| f.path == "vercel.json"));
        assert!(template.files.iter().all(|f| f.path != "Dockerfile"));
    }

    #[test]
    fn placeholders_are_fully_substituted() {
        for id in template_ids() {
            let template = resolve_template(id, "svc", "").template;
            for f in &template.files {
                assert!(!f.content.contains("{{"), "{id}:{} has placeholders", f.path);
            }
        }
    }

    #[test]
    fn manifest_stays_valid_json_with_quoted_description() {
        let template =
            resolve_template(TEMPLATE_CONTAINER_SERVICE, "svc", "the \"fast\" one").template;
        let manifest = find_file(&template, "package.json");
        let parsed: serde_json::Value = serde_json::from_str(&manifest.content).unwrap();
        assert_eq!(parsed["name"], "svc");
        assert_eq!(parsed["description"], "the \"fast\" one");
    }

    #[test]
    fn empty_description_gets_generated_text() {
        let template = resolve_template(TEMPLATE_PYTHON_WORKER, "w", "   ").template;
        let readme = find_file(&template, "README.md");
        assert!(readme.content.contains("scaffolded from the python-worker template"));
    }

    #[test]
    fn template_id_is_trimmed() {
        let resolution = resolve_template("  serverless-app ", "web", "");
        assert!(!resolution.fell_back);
        assert_eq!(resolution.template.name, TEMPLATE_SERVERLESS_APP);
    }

    #[test]
    fn readme_comes_first_in_file_order() {
        let template = resolve_template(TEMPLATE_CONTAINER_SERVICE, "svc", "").template;
        let paths: Vec<&str> = template.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            ["README.md", "package.json", ".env.example", "Dockerfile", ".dockerignore"]
        );
    }

    #[test]
    fn default_id_is_in_catalog() {
        assert!(template_ids().contains(&DEFAULT_TEMPLATE_ID));
        assert_eq!(default_definition().id, DEFAULT_TEMPLATE_ID);
    }

    #[test]
    fn pyproject_parses_with_multiline_description() {
        let description = "Queue worker\nfor billing\t\"v2\"";
        let template = resolve_template(TEMPLATE_PYTHON_WORKER, "w", description).template;
        let manifest = find_file(&template, "pyproject.toml");

        let parsed: toml::Table = toml::from_str(&manifest.content).unwrap();
        assert_eq!(parsed["project"]["name"].as_str(), Some("w"));
        assert_eq!(parsed["project"]["description"].as_str(), Some(description));
        assert_eq!(parsed["project"]["requires-python"].as_str(), Some(">=3.12"));
        assert_eq!(
            parsed["tool"]["repodeck"]["template"].as_str(),
            Some(TEMPLATE_PYTHON_WORKER)
        );
        assert_eq!(
            parsed["tool"]["repodeck"]["deploy-target"].as_str(),
            Some(DEPLOY_TARGET_DOCKER)
        );
    }

    // ---- target names ----

    #[test]
    fn accepts_typical_repository_names() {
        for name in ["svc", "payments-api", "my_repo.v2", "A1"] {
            assert!(validate_target_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_bad_repository_names() {
        let too_long = "r".repeat(MAX_TARGET_NAME_LENGTH + 1);
        for name in ["", ".", "..", "has space", "slash/name", too_long.as_str()] {
            assert!(
                matches!(validate_target_name(name), Err(CoreError::Validation(_))),
                "{name:?} should be rejected"
            );
        }
    }
}
