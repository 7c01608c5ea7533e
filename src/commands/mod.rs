/*!
Command handlers for the CLI

This module provides the handler invoked by the CLI entrypoint. It wires
the gateways, the tool registry and the agent from a loaded configuration,
then prints the result.
*/

pub mod console;

pub use console::ConsoleObserver;

// Question answering
pub mod ask {
    use super::ConsoleObserver;
    use crate::agent::{Agent, MetricsObserver, Observers, QaResult, TracingObserver};
    use crate::config::Config;
    use crate::error::Result;
    use crate::providers::{create_gateway, RetryPolicy};
    use crate::search::GoogleSearch;
    use crate::tools::ToolRegistry;
    use colored::Colorize;
    use std::sync::Arc;

    /// Build an agent from configuration
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` when an Anthropic or Google credential is
    /// absent, or a configuration error for invalid limits or endpoints
    pub fn build_agent(config: &Config) -> Result<Agent> {
        let gateway = create_gateway(config)?;
        let search = GoogleSearch::new(&config.search, RetryPolicy::from(&config.retry))?;
        let tools =
            ToolRegistry::with_default_tools(Arc::new(search), config.search.max_content_length);
        tracing::debug!("Registered {} tools", tools.len());

        let observers = Observers::new()
            .with(Arc::new(ConsoleObserver))
            .with(Arc::new(TracingObserver))
            .with(Arc::new(MetricsObserver::new()));

        Ok(Agent::new(gateway, tools, &config.agent)?.with_observer(Arc::new(observers)))
    }

    /// Answer one question and print the result
    ///
    /// The answer goes to stdout. With `verbose`, the executed steps follow it.
    ///
    /// # Arguments
    ///
    /// * `config` - Loaded configuration (consumed)
    /// * `question` - The question to answer
    /// * `verbose` - Print the reasoning steps after the answer
    ///
    /// # Errors
    ///
    /// Returns an error only when the agent cannot be built; failures inside
    /// the loop are reported through the answer text
    pub async fn run_ask(config: Config, question: &str, verbose: bool) -> Result<QaResult> {
        tracing::info!("Starting question answering");
        let agent = build_agent(&config)?;
        let result = agent.run(question).await;

        println!("\n{}", "Answer:".green().bold());
        println!("{}", result.answer);

        if verbose {
            print_steps(&result);
        }
        Ok(result)
    }

    fn print_steps(result: &QaResult) {
        println!("\n{}", "Reasoning steps:".bold());
        if result.steps.is_empty() {
            println!("  (no tools used)");
        }
        for (i, step) in result.steps.iter().enumerate() {
            println!("\n{}. {}", i + 1, step.tool.yellow());
            if !step.thought.is_empty() {
                println!("   Thought: {}", step.thought);
            }
            println!("   Input: {}", step.tool_input);
            println!("   Observation: {}", step.observation);
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::test_utils::test_config;

        #[test]
        fn test_build_agent_requires_anthropic_key() {
            let mut config = test_config();
            config.model.api_key = None;
            let err = build_agent(&config).err().unwrap();
            assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
        }

        #[test]
        fn test_build_agent_requires_google_credentials() {
            let mut config = test_config();
            config.search.engine_id = None;
            assert!(build_agent(&config).is_err());
        }

        #[test]
        fn test_build_agent_registers_default_tools() {
            let agent = build_agent(&test_config()).unwrap();
            assert_eq!(agent.tools().len(), 4);
        }
    }
}
