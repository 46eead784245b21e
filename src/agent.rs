//! Agent identity: role, goal, backstory and generation settings.
//!
//! An agent is a named prompt persona. The role/goal/backstory become the
//! system message of every completion the agent makes; the temperature is
//! passed through to the model.

use serde::Serialize;
use uuid::Uuid;

use crate::config::AgentConfig;

/// A prompt persona with generation settings.
#[derive(Debug, Clone, Serialize)]
pub struct Agent {
    /// Unique identifier for this agent instance.
    pub id: Uuid,
    /// Role of the agent, e.g. "Expert Content Writer".
    pub role: String,
    /// Objective of the agent.
    pub goal: String,
    /// Persona background woven into the system prompt.
    pub backstory: String,
    /// Sampling temperature for this agent's completions.
    pub temperature: f64,
    /// Upper bound on model iterations for one task.
    pub max_iter: u32,
}

impl Agent {
    /// Create an agent with default generation settings.
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            temperature: 0.7,
            max_iter: 3,
        }
    }

    /// Build an agent from its configuration entry.
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: config.role.clone(),
            goal: config.goal.clone(),
            backstory: config.backstory.clone(),
            temperature: config.temperature,
            max_iter: config.max_iter,
        }
    }

    /// The system message sent with every completion this agent makes.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {role}. {backstory}\n\nYour goal: {goal}",
            role = self.role,
            backstory = self.backstory,
            goal = self.goal
        )
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Agent(role={}, temperature={})", self.role, self.temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_contains_persona() {
        let agent = Agent::new("Scheduling Strategist", "Optimize schedules", "You know timing.");
        let prompt = agent.system_prompt();
        assert!(prompt.contains("You are Scheduling Strategist"));
        assert!(prompt.contains("You know timing."));
        assert!(prompt.contains("Your goal: Optimize schedules"));
    }

    #[test]
    fn test_from_config_copies_settings() {
        let config = AgentConfig {
            role: "Researcher".into(),
            goal: "Find topics".into(),
            backstory: "Strategist.".into(),
            temperature: 0.3,
            max_iter: 5,
        };
        let agent = Agent::from_config(&config);
        assert_eq!(agent.temperature, 0.3);
        assert_eq!(agent.max_iter, 5);
        assert_eq!(agent.role, "Researcher");
    }
}
