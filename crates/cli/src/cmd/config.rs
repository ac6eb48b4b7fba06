//! The `config` task: print the resolved configuration as JSON.

use std::rc::Rc;

use lathe_lib::task::Task;
use lathe_lib::workflow::Context;

pub fn config_task(ctx: Rc<Context>) -> Task {
  Task::action("config", Vec::<String>::new(), move || {
    let json = serde_json::to_string_pretty(&ctx.config).map_err(std::io::Error::from)?;
    println!("{json}");
    Ok(())
  })
  .describe("Print the resolved configuration as JSON")
}
