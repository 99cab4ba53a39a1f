use super::Context;

#[derive(Default)]
pub struct SetArgs {
    pub default_rate: Option<f32>,
    pub default_voice: Option<String>,
    pub auto_scroll: Option<bool>,
    pub autosave_delay_ms: Option<u64>,
}

impl SetArgs {
    fn into_json(self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        if let Some(rate) = self.default_rate {
            map.insert(
                "default_rate".into(),
                hypr_speech_interface::clamp_rate(rate).into(),
            );
        }
        if let Some(voice) = self.default_voice {
            map.insert("default_voice".into(), voice.into());
        }
        if let Some(auto_scroll) = self.auto_scroll {
            map.insert("auto_scroll".into(), auto_scroll.into());
        }
        if let Some(delay) = self.autosave_delay_ms {
            map.insert("autosave_delay_ms".into(), delay.into());
        }
        serde_json::Value::Object(map)
    }
}

pub async fn show(ctx: &Context) -> anyhow::Result<()> {
    let settings = ctx.settings.load().await?;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

pub async fn set(ctx: &Context, args: SetArgs) -> anyhow::Result<()> {
    ctx.settings.save(args.into_json()).await?;
    show(ctx).await
}

pub fn reset(ctx: &Context) -> anyhow::Result<()> {
    ctx.settings.reset()?;
    Ok(())
}
