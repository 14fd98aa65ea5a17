use std::thread;

use capture_bridge::{
    BufferQueue, BufferQueueConfig, DeviceOrientation, FormatDescriptor, ImageBuffer,
    PixelFormat, SampleBuffer, SampleTime, VideoDimensions, create_buffer_queue_with,
    get_video_dimensions, map_orientation, try_narrow_to_pixel_buffer,
};

fn main() {
    let dims = VideoDimensions::new(4, 2);
    let format = FormatDescriptor::video(PixelFormat::Bgra32.fourcc(), dims);
    println!(
        "format {} {}x{}",
        format.media_subtype(),
        get_video_dimensions(&format).width,
        get_video_dimensions(&format).height
    );

    let queue: BufferQueue = create_buffer_queue_with(BufferQueueConfig::bounded(4))
        .expect("failed to create preview queue");

    let producer = {
        let queue = queue.clone();
        let format = format.clone();
        thread::spawn(move || {
            for i in 0..8u8 {
                let image = ImageBuffer::packed(PixelFormat::Bgra32, dims, 16, vec![i; 32])
                    .expect("valid frame");
                let time = SampleTime::new(i as i64, 30);
                let sample = SampleBuffer::new(format.clone(), Some(image), time);
                // Preview drops frames the consumer has not caught up with.
                if let Err(e) = queue.enqueue(sample) {
                    println!("dropped frame {i}: {e} (status {})", e.code());
                }
            }
            queue.mark_end_of_data();
        })
    };

    let mut shown = 0;
    while !queue.is_at_end_of_data() {
        let Some(sample) = queue.dequeue() else {
            thread::yield_now();
            continue;
        };
        if let Some(pixels) = sample.image_buffer().and_then(try_narrow_to_pixel_buffer) {
            println!(
                "t={:.3}s {}x{} first byte {}",
                sample.presentation_time().as_secs_f64(),
                pixels.width(),
                pixels.height(),
                pixels.planes()[0].data[0]
            );
            shown += 1;
        }
    }
    producer.join().expect("producer panicked");
    println!("shown {shown} frames");

    for orientation in [
        DeviceOrientation::Portrait,
        DeviceOrientation::LandscapeLeft,
        DeviceOrientation::LandscapeRight,
        DeviceOrientation::FaceUp,
    ] {
        println!("{orientation:?} -> {:?}", map_orientation(orientation));
    }
}
