use serde::Deserialize;
use validator::Validate;

use crate::models::TaskChanges;

pub use crate::models::{List, Task};

#[derive(Debug, Deserialize, Validate)]
pub struct ListRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub title: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub title: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl ListRequest {
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
        }
    }
}

impl CreateTaskRequest {
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
        }
    }
}

impl UpdateTaskRequest {
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.map(|t| t.trim().to_string()),
            completed: self.completed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(request: UpdateTaskRequest) -> Self {
        Self {
            title: request.title,
            completed: request.completed,
        }
    }
}
