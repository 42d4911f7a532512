//! The task handed to the implementer.

use std::path::Path;

use crate::error::{CrewError, Result};

/// Built-in task: a PLY header loader for the Vulkan 3DGS project.
pub const DEFAULT_TASK: &str = "\
Instruction from the Master:

GitHub repo: ArtabanMind/Vulkan_3DGS
Project: \"Fully trainable 3DGS using Vulkan f/w for Mobile\"
(fully trainable 3D Gaussian Splatting on Vulkan for mobile devices)

Write a simple C++ utility function that loads PLY files,
to be added under this project's src/ directory.

Requirements:
1. A function that parses the PLY file header
2. Reading the vertex_count
3. Error handling included
4. A structure that integrates with the Vulkan project (keep it lightweight for mobile)
";

/// Read the task from `path`, or fall back to [`DEFAULT_TASK`].
pub fn load_task(path: Option<&Path>) -> Result<String> {
    let Some(path) = path else {
        return Ok(DEFAULT_TASK.to_string());
    };

    let task = std::fs::read_to_string(path)?;
    if task.trim().is_empty() {
        return Err(CrewError::Config(format!(
            "task file {} is empty",
            path.display()
        )));
    }
    Ok(task)
}
