//! File operation tool: read, write, create, or delete a single file.

use crate::{BuiltinTool, ToolContext, ToolError, ToolResult, truncate_output};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Built-in tool for basic file management.
pub struct FileOperationTool;

/// Supported operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Read,
    Write,
    Create,
    Delete,
}

impl Operation {
    fn parse(s: &str) -> Result<Self, ToolError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "create" => Ok(Self::Create),
            "delete" => Ok(Self::Delete),
            other => Err(ToolError::InvalidArguments(format!(
                "unsupported operation: {other} (expected read, write, create, or delete)"
            ))),
        }
    }
}

#[async_trait::async_trait]
impl BuiltinTool for FileOperationTool {
    fn name(&self) -> &'static str {
        "file_operation"
    }

    fn description(&self) -> &'static str {
        "Performs a file operation: read, write, create, or delete. \
         write replaces the file's contents and creates missing parent directories. \
         create fails if the file already exists. Relative paths resolve against \
         the working directory."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": ["read", "write", "create", "delete"],
                    "description": "The operation to perform"
                },
                "file_path": {
                    "type": "string",
                    "description": "Path to the file"
                },
                "content": {
                    "type": "string",
                    "description": "File contents (required for write, optional for create)"
                }
            },
            "required": ["operation", "file_path"]
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult {
        let operation = args
            .get("operation")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArguments("operation is required".into()))
            .and_then(Operation::parse)?;

        let file_path = args
            .get("file_path")
            .or_else(|| args.get("path"))
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("file_path is required".into()))?;

        let content = args.get("content").and_then(Value::as_str);
        let path = ctx.resolve(file_path);

        debug!(?operation, path = %path.display(), "File operation");

        match operation {
            Operation::Read => {
                if !path.is_file() {
                    return Err(ToolError::PathNotFound(file_path.to_string()));
                }
                let raw = tokio::fs::read(&path).await?;
                let text = String::from_utf8(raw).map_err(|_| {
                    ToolError::ExecutionFailed(format!("{file_path} is not valid UTF-8"))
                })?;
                Ok(truncate_output(text, ctx.max_output_chars))
            },
            Operation::Write => {
                let content = content.ok_or_else(|| {
                    ToolError::InvalidArguments("content is required for write".into())
                })?;
                ensure_parent(&path).await?;
                tokio::fs::write(&path, content).await?;
                Ok(format!(
                    "Wrote {} bytes to {}",
                    content.len(),
                    path.display()
                ))
            },
            Operation::Create => {
                if path.exists() {
                    return Err(ToolError::AlreadyExists(file_path.to_string()));
                }
                ensure_parent(&path).await?;
                tokio::fs::write(&path, content.unwrap_or_default()).await?;
                Ok(format!("Created {}", path.display()))
            },
            Operation::Delete => {
                if !path.is_file() {
                    return Err(ToolError::PathNotFound(file_path.to_string()));
                }
                tokio::fs::remove_file(&path).await?;
                Ok(format!("Deleted {}", path.display()))
            },
        }
    }
}

async fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            tokio::fs::create_dir_all(parent).await
        },
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ctx(dir: &TempDir) -> ToolContext {
        ToolContext::new(dir.path().to_path_buf())
    }

    #[tokio::test]
    async fn test_write_then_read_relative_path() {
        let dir = TempDir::new().unwrap();
        let ctx = ctx(&dir);

        let msg = FileOperationTool
            .execute(
                serde_json::json!({"operation": "write", "file_path": "notes/todo.txt", "content": "buy milk"}),
                &ctx,
            )
            .await
            .unwrap();
        assert!(msg.contains("Wrote 8 bytes"));
        assert!(dir.path().join("notes/todo.txt").exists());

        let read = FileOperationTool
            .execute(
                serde_json::json!({"operation": "read", "file_path": "notes/todo.txt"}),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(read, "buy milk");
    }

    #[tokio::test]
    async fn test_write_requires_content() {
        let dir = TempDir::new().unwrap();
        let err = FileOperationTool
            .execute(
                serde_json::json!({"operation": "write", "file_path": "a.txt"}),
                &ctx(&dir),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_create_refuses_existing_file() {
        let dir = TempDir::new().unwrap();
        let ctx = ctx(&dir);
        let args = serde_json::json!({"operation": "create", "file_path": "new.txt"});

        FileOperationTool.execute(args.clone(), &ctx).await.unwrap();
        assert_eq!(std::fs::read_to_string(dir.path().join("new.txt")).unwrap(), "");

        let err = FileOperationTool.execute(args, &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("gone.txt");
        std::fs::write(&file, "bye").unwrap();

        FileOperationTool
            .execute(
                serde_json::json!({"operation": "delete", "file_path": file.to_str().unwrap()}),
                &ctx(&dir),
            )
            .await
            .unwrap();
        assert!(!file.exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_path_not_found() {
        let dir = TempDir::new().unwrap();
        for op in ["read", "delete"] {
            let err = FileOperationTool
                .execute(
                    serde_json::json!({"operation": op, "file_path": "missing.txt"}),
                    &ctx(&dir),
                )
                .await
                .unwrap_err();
            assert!(matches!(err, ToolError::PathNotFound(_)), "{op}");
        }
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let dir = TempDir::new().unwrap();
        let err = FileOperationTool
            .execute(
                serde_json::json!({"operation": "chmod", "file_path": "x"}),
                &ctx(&dir),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unsupported operation"));
    }

    #[tokio::test]
    async fn test_path_alias_accepted() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("alias.txt"), "hi").unwrap();
        let read = FileOperationTool
            .execute(
                serde_json::json!({"operation": "read", "path": "alias.txt"}),
                &ctx(&dir),
            )
            .await
            .unwrap();
        assert_eq!(read, "hi");
    }
}
