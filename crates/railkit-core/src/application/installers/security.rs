use crate::application::services::installer::{FeatureInstaller, InstallContext};
use crate::application::services::project::Project;
use crate::domain::{Anchor, DependencySpec, Feature, SectionMarker};
use crate::error::RailkitResult;

const DEPENDENCIES: &[DependencySpec] = &[
    DependencySpec::runtime("secure_headers").anchored(Anchor::Before(SectionMarker::Development)),
    DependencySpec::runtime("rack-attack").anchored(Anchor::Before(SectionMarker::Development)),
];

const SECURE_HEADERS: &str = "config/initializers/secure_headers.rb";
const SECURE_HEADERS_BODY: &str = r#"SecureHeaders::Configuration.default do |config|
  config.csp.build(:default_src => :self)
  config.hsts = {
    override: true,
    include_subdomains: true,
    max_age: 31_556_926 # 1 year (in seconds)
  }
  config.x_frame_options = :DENY
  config.x_content_type_options = :nosniff
  config.x_xss_protection = { value: '1; mode=block' }
  config.x_permitted_cross_domain_policies = :none
  config.referrer_policy = :strict_origin_when_cross_origin
end
"#;

const RACK_ATTACK: &str = "config/initializers/rack_attack.rb";
const RACK_ATTACK_BODY: &str = r#"class Rack::Attack
  # Throttle login attempts (brute force protection)
  throttle("req/ip login", limit: 5, period: 1.minute) do |req|
    req.ip if req.path == "/users/sign_in" && req.post?
  end

  # Throttle API requests
  throttle("req/ip api", limit: 100, period: 1.minute) do |req|
    req.ip if req.path.start_with?("/api")
  end

  # Block obvious bad bots
  blocklist("bad bots") do |req|
    req.user_agent.to_s.downcase.match?(/\b(ahrefs|semrush|mj12bot)\b/i)
  end
end
"#;

/// Security headers and rate limiting.
pub struct SecurityInstaller;

impl FeatureInstaller for SecurityInstaller {
    fn feature(&self) -> Feature {
        Feature::Security
    }

    fn is_installed(&self, project: &Project) -> bool {
        let ledger = project.ledger();
        ledger.is_declared("secure_headers")
            && ledger.is_declared("rack-attack")
            && project.exists(RACK_ATTACK)
    }

    fn dependencies(&self) -> &'static [DependencySpec] {
        DEPENDENCIES
    }

    fn write_artifacts(&self, ctx: &mut InstallContext<'_>) -> RailkitResult<()> {
        let effect = ctx.project.create_file(SECURE_HEADERS, SECURE_HEADERS_BODY)?;
        ctx.track(effect, "secure_headers initializer (CSP, HSTS, X-Frame)");
        let effect = ctx.project.create_file(RACK_ATTACK, RACK_ATTACK_BODY)?;
        ctx.track(effect, "rack-attack rate limiting");
        Ok(())
    }
}
