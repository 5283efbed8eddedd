use anyhow::Result;

/// Filtering and wrapping parameters for a 2D texture.
#[derive(Debug, Copy, Clone)]
pub struct SamplerParams {
    pub mag_filter: wgpu::FilterMode,
    pub min_filter: wgpu::FilterMode,
    pub address_mode_u: wgpu::AddressMode,
    pub address_mode_v: wgpu::AddressMode,
}

impl SamplerParams {
    /// Nearest-neighbor filtering with repeat wrapping on both axes.
    ///
    /// The mode a hard-edged procedural pattern needs: texel-center samples
    /// never blend neighboring texels.
    pub fn nearest_repeat() -> Self {
        Self {
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
        }
    }
}

/// GPU-resident 2D image with its sampling parameters.
///
/// Contents are immutable after upload; dropping the value releases the GPU
/// resources.
pub struct Texture2d {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl Texture2d {
    /// Uploads a tightly packed RGBA8 pixel buffer.
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &[u8],
        width: u32,
        height: u32,
        params: SamplerParams,
    ) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "texture has zero size");
        anyhow::ensure!(
            pixels.len() as u64 == u64::from(width) * u64::from(height) * 4,
            "pixel buffer length {} does not match {width}x{height} RGBA8",
            pixels.len()
        );

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("girouette texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("girouette sampler"),
            address_mode_u: params.address_mode_u,
            address_mode_v: params.address_mode_v,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: params.mag_filter,
            min_filter: params.min_filter,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            sampler,
        })
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_repeat_params() {
        let p = SamplerParams::nearest_repeat();
        assert_eq!(p.mag_filter, wgpu::FilterMode::Nearest);
        assert_eq!(p.min_filter, wgpu::FilterMode::Nearest);
        assert_eq!(p.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(p.address_mode_v, wgpu::AddressMode::Repeat);
    }
}
