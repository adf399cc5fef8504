//! Sign-up form.
//!
//! The form renders a different field set per selected role, so it is a
//! tagged union rather than one shared field bag with unused members per
//! variant. Validation runs per variant before the single POST.

use serde::Serialize;

use crate::backend::Backend;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum SignupForm {
    Owner {
        #[serde(flatten)]
        identity: Identity,
        business_name: String,
        business_address: String,
    },
    Customer {
        #[serde(flatten)]
        identity: Identity,
    },
    Worker {
        #[serde(flatten)]
        identity: Identity,
        business_id: i64,
        expertise: String,
    },
}

impl SignupForm {
    fn identity(&self) -> &Identity {
        match self {
            Self::Owner { identity, .. }
            | Self::Customer { identity }
            | Self::Worker { identity, .. } => identity,
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let identity = self.identity();
        if identity.first_name.trim().is_empty() {
            return Err(ApiError::validation("first_name", "required"));
        }
        if identity.last_name.trim().is_empty() {
            return Err(ApiError::validation("last_name", "required"));
        }
        if !identity.email.contains('@') {
            return Err(ApiError::validation("email", "not a valid address"));
        }
        if identity.password.len() < 8 {
            return Err(ApiError::validation("password", "at least 8 characters"));
        }
        match self {
            Self::Owner { business_name, .. } if business_name.trim().is_empty() => {
                Err(ApiError::validation("business_name", "required"))
            }
            Self::Worker { expertise, .. } if expertise.trim().is_empty() => {
                Err(ApiError::validation("expertise", "required"))
            }
            _ => Ok(()),
        }
    }

    pub async fn submit(&self, backend: &Backend) -> Result<(), ApiError> {
        self.validate()?;
        backend.post_envelope("/signup", self).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            first_name: "Dana".to_string(),
            last_name: "Reyes".to_string(),
            email: "dana@example.com".to_string(),
            password: "hunter2hunter2".to_string(),
        }
    }

    #[test]
    fn test_customer_variant_validates() {
        let form = SignupForm::Customer {
            identity: identity(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_owner_requires_business_name() {
        let form = SignupForm::Owner {
            identity: identity(),
            business_name: "".to_string(),
            business_address: "12 High St".to_string(),
        };
        match form.validate() {
            Err(ApiError::Validation { field, .. }) => assert_eq!(field, "business_name"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_worker_requires_expertise() {
        let form = SignupForm::Worker {
            identity: identity(),
            business_id: 5,
            expertise: " ".to_string(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_wire_shape_is_tagged_by_role() {
        let form = SignupForm::Worker {
            identity: identity(),
            business_id: 5,
            expertise: "braiding".to_string(),
        };
        let wire = serde_json::to_value(&form).unwrap();
        assert_eq!(wire["role"], "worker");
        assert_eq!(wire["business_id"], 5);
        assert_eq!(wire["first_name"], "Dana");
    }
}
