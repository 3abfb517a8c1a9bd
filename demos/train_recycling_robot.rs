use std::{error::Error, fs, path::Path};

use log::info;
use recycling_robot::{
    algo::tabular::{QTableAgent, QTableAgentConfig},
    gym::{RecyclingRobot, RecyclingRobotConfig},
    train::{train, RewardLog, TrainingConfig},
};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = Path::new("demos/out");

    let mut env = RecyclingRobot::new(RecyclingRobotConfig::default())?;
    let mut agent = QTableAgent::new(&env, QTableAgentConfig::default())?;
    let mut rewards = RewardLog::new();
    let config = TrainingConfig::default();

    train(&mut agent, &mut env, &config, &mut rewards)?;
    info!(
        "Trained for {} episodes, mean reward {:.1}",
        rewards.len(),
        rewards.mean().unwrap_or_default()
    );

    fs::create_dir_all(path)?;
    let mut wtr = csv::Writer::from_path(path.join("rewards.csv"))?;
    wtr.write_record(["episode", "reward"])?;
    for (i, total) in rewards.totals().iter().enumerate() {
        wtr.write_record(&[(i + 1).to_string(), total.to_string()])?;
    }
    wtr.flush()?;

    println!("Final Q table:");
    for (state, row) in agent.q_table().iter() {
        println!("State: {}", state);
        for (action, q) in row {
            println!(" - Action '{}': {:.2}", action, q);
        }
    }

    println!("Greedy policy:");
    for (state, action) in agent.q_table().greedy_policy()? {
        println!(" - {}: {}", state, action);
    }

    Ok(())
}
